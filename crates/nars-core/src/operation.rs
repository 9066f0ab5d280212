//! Operations the backend asks the environment to perform

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Marker that prefixes operation names in NAL sentences
pub const OPERATOR_MARKER: char = '^';

/// A backend operation, identified by its canonical name
///
/// The canonical name never carries the operator marker. Names copied
/// straight from backend output (`"^left"`) are accepted and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Operation {
    name: String,
}

impl Operation {
    /// Create an operation, stripping a leading operator marker if present
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix(OPERATOR_MARKER) {
            Some(stripped) => {
                warn!("Operation name {:?} carries an operator marker, stripping it", name);
                Self {
                    name: stripped.to_string(),
                }
            }
            None => {
                if name.is_empty() {
                    warn!("Operation constructed with an empty name");
                }
                Self { name }
            }
        }
    }

    /// Canonical name, without the operator marker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as written in NAL sentences (`^name`)
    pub fn encoded(&self) -> String {
        format!("{}{}", OPERATOR_MARKER, self.name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", OPERATOR_MARKER, self.name)
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        Operation::new(name)
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::new(name)
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.name
    }
}
