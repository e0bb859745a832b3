use std::fmt;

/// Overall classification of one evaluation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Run,
    Passed,
    PartiallyPassed,
    Failed,
}

impl Verdict {
    /// Classifies a graded run from its pass counts. A problem with zero
    /// test cases grades as failed, never as vacuously passed.
    pub fn classify(passed: u32, total: u32) -> Self {
        if total > 0 && passed == total {
            Verdict::Passed
        } else if passed > 0 {
            Verdict::PartiallyPassed
        } else {
            Verdict::Failed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Run => "RUN",
            Verdict::Passed => "PASSED",
            Verdict::PartiallyPassed => "PARTIALLY PASSED",
            Verdict::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Verdict;

    #[test]
    fn all_cases_passing_is_passed() {
        assert_eq!(Verdict::classify(3, 3), Verdict::Passed);
    }

    #[test]
    fn some_cases_passing_is_partially_passed() {
        assert_eq!(Verdict::classify(1, 3), Verdict::PartiallyPassed);
        assert_eq!(Verdict::classify(2, 3), Verdict::PartiallyPassed);
    }

    #[test]
    fn no_cases_passing_is_failed() {
        assert_eq!(Verdict::classify(0, 3), Verdict::Failed);
    }

    #[test]
    fn zero_test_cases_is_failed_not_vacuously_passed() {
        assert_eq!(Verdict::classify(0, 0), Verdict::Failed);
    }

    #[test]
    fn display_matches_stored_labels() {
        assert_eq!(Verdict::Run.to_string(), "RUN");
        assert_eq!(Verdict::PartiallyPassed.to_string(), "PARTIALLY PASSED");
    }
}
