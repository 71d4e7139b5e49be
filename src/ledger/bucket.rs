use enum_dispatch::enum_dispatch;

use super::Classify;

/// Tokens that route a code into the salary bucket.
pub const SALARY_TOKENS: [&str; 2] = ["NoObject", "Salary"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Salary and no-object entries, the left column pair.
    Salary,
    /// Everything else, the right column pair.
    Other,
}

#[enum_dispatch(Classify)]
#[derive(Debug, Clone)]
pub enum Classifier {
    SubstringClassifier,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::SubstringClassifier(SubstringClassifier::default())
    }
}

/// Case-sensitive substring match against a fixed token list.
#[derive(Debug, Clone)]
pub struct SubstringClassifier {
    tokens: Vec<String>,
}

impl SubstringClassifier {
    pub fn new<I, S>(tokens: I) -> SubstringClassifier
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SubstringClassifier {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SubstringClassifier {
    fn default() -> Self {
        SubstringClassifier::new(SALARY_TOKENS)
    }
}

impl Classify for SubstringClassifier {
    fn classify(&self, code: &str) -> Bucket {
        if self.tokens.iter().any(|token| code.contains(token.as_str())) {
            Bucket::Salary
        } else {
            Bucket::Other
        }
    }
}
