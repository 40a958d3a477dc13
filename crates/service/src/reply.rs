use serde::{Deserialize, Serialize};

/// A candidate condition suggested by the service.
///
/// The position of a condition inside [`QueryReply::conditions`] is its
/// relevance rank, so the list must never be reordered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Name of the condition, never empty.
    pub condition: String,
    /// Explanation of why the condition is suggested. May be empty.
    #[serde(default)]
    pub text: String,
}

impl Condition {
    /// Creates a condition with its explanation.
    #[inline]
    pub fn new<N: Into<String>, T: Into<String>>(condition: N, text: T) -> Self {
        Self {
            condition: condition.into(),
            text: text.into(),
        }
    }
}

/// A successful answer to a symptom query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryReply {
    /// The natural-language summary.
    pub response: String,
    /// Candidate conditions, most relevant first. Empty when the service
    /// has nothing to suggest.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl QueryReply {
    /// Creates a reply that carries only a summary.
    #[inline]
    pub fn text_only<S: Into<String>>(response: S) -> Self {
        Self {
            response: response.into(),
            conditions: vec![],
        }
    }

    /// Attaches the candidate conditions.
    #[inline]
    pub fn with_conditions(
        mut self,
        conditions: impl Into<Vec<Condition>>,
    ) -> Self {
        self.conditions = conditions.into();
        self
    }
}
