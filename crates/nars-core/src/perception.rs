//! Perceptions pushed from the environment to the backend

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject naming the agent itself
pub const SELF_SUBJECT: &str = "SELF";

/// A fact "subject has predicate", pushed to the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perception {
    subject: String,
    predicate: String,
}

impl Perception {
    /// Create a perception about an arbitrary subject
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
        }
    }

    /// Create a perception about the agent itself
    pub fn of_self(predicate: impl Into<String>) -> Self {
        Self::new(SELF_SUBJECT, predicate)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }
}

impl fmt::Display for Perception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{{{}}} --> [{}]>.", self.subject, self.predicate)
    }
}
