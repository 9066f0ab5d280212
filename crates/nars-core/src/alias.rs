//! Explicit alias tables mapping environment vocabulary to operations

use crate::operation::Operation;
use std::collections::HashMap;

/// Lookup table from environment-side names to backend operations
///
/// Environments with their own action vocabulary (keys, moves, board
/// cells) map it here instead of relying on positional conventions.
#[derive(Debug, Clone, Default)]
pub struct OperationAliases {
    aliases: HashMap<String, Operation>,
}

impl OperationAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(alias, operation name)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::new();
        for (alias, name) in pairs {
            table.insert(alias, Operation::new(name));
        }
        table
    }

    /// Add or replace an alias, returning the previous target
    pub fn insert(&mut self, alias: impl Into<String>, operation: Operation) -> Option<Operation> {
        self.aliases.insert(alias.into(), operation)
    }

    pub fn resolve(&self, alias: &str) -> Option<&Operation> {
        self.aliases.get(alias)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
