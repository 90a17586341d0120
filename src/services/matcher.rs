//! Thread subject matching.

use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::models::MatcherConfig;

/// Decides which catalog threads get watched, by subject.
///
/// Implemented for plain closures, so custom rules need no new type:
///
/// ```
/// use mutube::services::SubjectMatcher;
///
/// let daily = |subject: &str| subject.starts_with("/daily/");
/// assert!(daily.matches("/daily/ - Daily General"));
/// ```
pub trait SubjectMatcher: Send + Sync {
    fn matches(&self, subject: &str) -> bool;
}

impl<F> SubjectMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, subject: &str) -> bool {
        self(subject)
    }
}

/// Case-insensitive whole-subject membership.
#[derive(Debug, Clone, Default)]
pub struct SubjectList {
    subjects: Vec<String>,
}

impl SubjectList {
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            subjects: subjects
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl SubjectMatcher for SubjectList {
    fn matches(&self, subject: &str) -> bool {
        let subject = subject.to_lowercase();
        self.subjects.iter().any(|s| *s == subject)
    }
}

/// Case-insensitive regular expression search.
#[derive(Debug, Clone)]
pub struct SubjectPattern {
    pattern: Regex,
}

impl SubjectPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }
}

impl SubjectMatcher for SubjectPattern {
    fn matches(&self, subject: &str) -> bool {
        self.pattern.is_match(subject)
    }
}

/// Build the matcher a configuration asks for.
pub fn from_config(config: &MatcherConfig) -> Result<Box<dyn SubjectMatcher>> {
    Ok(match config {
        MatcherConfig::Subjects(subjects) => Box::new(SubjectList::new(subjects)),
        MatcherConfig::Pattern(pattern) => Box::new(SubjectPattern::new(pattern)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_list_is_case_insensitive() {
        let list = SubjectList::new(["/Metal/", "punk general"]);
        assert!(list.matches("/metal/"));
        assert!(list.matches("Punk General"));
        assert!(!list.matches("/metal/ - Metal General"));
        assert!(!list.matches(""));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let list = SubjectList::new(Vec::<String>::new());
        assert!(!list.matches("/daily/"));
    }

    #[test]
    fn test_pattern() {
        let pattern = SubjectPattern::new("^/daily/").unwrap();
        assert!(pattern.matches("/DAILY/ - Daily General"));
        assert!(!pattern.matches("/offtopic/"));
    }

    #[test]
    fn test_from_config() {
        let matcher = from_config(&MatcherConfig::Subjects(vec!["/daily/".into()])).unwrap();
        assert!(matcher.matches("/daily/"));
        assert!(from_config(&MatcherConfig::Pattern("[".into())).is_err());
    }
}
