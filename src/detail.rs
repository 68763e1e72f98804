//! Detail view support: id lookup and description formatting.

pub mod format;

pub use format::{format_description, Block, Inline};

use crate::dataset::ArchiveEntry;
use std::collections::HashMap;

/// Hash index from incident id to archive position, built once per load
#[derive(Debug, Clone, Default)]
pub struct IncidentIndex {
    positions: HashMap<String, usize>,
}

impl IncidentIndex {
    /// Index ids by their position in iteration order. Ids are expected to be
    /// unique; if one repeats, the first position wins.
    pub fn build<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut positions = HashMap::new();
        for (position, id) in ids.into_iter().enumerate() {
            positions.entry(id.to_string()).or_insert(position);
        }
        Self { positions }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Outcome of resolving a detail-view id. A miss is a normal result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a ArchiveEntry),
    NotFound { id: String },
}

impl<'a> Resolution<'a> {
    pub fn found(&self) -> Option<&'a ArchiveEntry> {
        match self {
            Resolution::Found(entry) => Some(entry),
            Resolution::NotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_wins() {
        let index = IncidentIndex::build(["a", "b", "a"]);
        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.position("b"), Some(1));
        assert_eq!(index.position("c"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_index() {
        let index = IncidentIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.position("inc-042"), None);
    }
}
