use std::fmt;

/// Language tag attached to a submission. Tags the platform does not
/// recognize are carried through unchanged so the execution backend can
/// still be asked to run them with its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Python3,
    JavaScript,
    Java,
    Cpp,
    Other(String),
}

impl Language {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "python3" => Language::Python3,
            "javascript" => Language::JavaScript,
            "java" => Language::Java,
            "cpp" => Language::Cpp,
            other => Language::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Language::Python3 => "python3",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn known_tags_roundtrip() {
        for tag in ["python3", "javascript", "java", "cpp"] {
            assert_eq!(Language::from_tag(tag).tag(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let language = Language::from_tag("ruby");
        assert_eq!(language, Language::Other("ruby".to_string()));
        assert_eq!(language.tag(), "ruby");
    }
}
