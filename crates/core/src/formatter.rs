//! Turns candidate conditions into renderable segments.

use std::fmt::{self, Display};

use symptom_chat_service::Condition;

/// Title heading a condition list.
pub const CONDITIONS_TITLE: &str = "Possible Conditions";

/// A renderable piece of a condition list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The list title, see [`CONDITIONS_TITLE`].
    Title,
    /// One candidate condition.
    Entry(ConditionEntry),
}

/// A ranked candidate condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionEntry {
    /// 1-based position in the order the service returned.
    pub rank: usize,
    /// Name of the condition.
    pub condition: String,
    /// Explanation, possibly empty.
    pub text: String,
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Title => f.write_str(CONDITIONS_TITLE),
            Segment::Entry(entry) => Display::fmt(entry, f),
        }
    }
}

impl Display for ConditionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}. {}", self.rank, self.condition)
        } else {
            write!(f, "{}. {} — {}", self.rank, self.condition, self.text)
        }
    }
}

/// Formats the conditions as a title followed by one entry per condition,
/// in the given order.
///
/// An empty list yields no segments at all, not even the title.
pub fn format_conditions(conditions: &[Condition]) -> Vec<Segment> {
    if conditions.is_empty() {
        return vec![];
    }

    let entries = conditions.iter().enumerate().map(|(idx, c)| {
        Segment::Entry(ConditionEntry {
            rank: idx + 1,
            condition: c.condition.clone(),
            text: c.text.clone(),
        })
    });
    std::iter::once(Segment::Title).chain(entries).collect()
}
