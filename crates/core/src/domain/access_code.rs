use std::fmt;
use uuid::Uuid;

/// Marker prefix for ephemeral practice assessments. Codes carrying it are
/// excluded from admin listings.
pub const PRACTICE_PREFIX: &str = "PRACTICE-";

const CODE_LEN: usize = 8;

/// Opaque string gating entry to one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessCode(String);

impl AccessCode {
    pub fn generate() -> Self {
        Self(short_code())
    }

    pub fn generate_practice() -> Self {
        Self(format!("{PRACTICE_PREFIX}{}", short_code()))
    }

    pub fn is_practice(&self) -> bool {
        self.0.starts_with(PRACTICE_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for AccessCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn short_code() -> String {
    Uuid::new_v4().to_string()[..CODE_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::{AccessCode, PRACTICE_PREFIX};

    #[test]
    fn generated_codes_are_eight_chars() {
        assert_eq!(AccessCode::generate().as_str().len(), 8);
    }

    #[test]
    fn practice_codes_carry_the_prefix() {
        let code = AccessCode::generate_practice();
        assert!(code.is_practice());
        assert!(code.as_str().starts_with(PRACTICE_PREFIX));
        assert_eq!(code.as_str().len(), PRACTICE_PREFIX.len() + 8);
    }

    #[test]
    fn plain_codes_are_not_practice() {
        assert!(!AccessCode::generate().is_practice());
    }
}
