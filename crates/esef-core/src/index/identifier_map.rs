//! Insertion-ordered LEI → filings grouping.

use super::Filing;
use std::collections::HashMap;

/// Filings grouped by legal-entity identifier.
///
/// Identifiers iterate in first-seen order; filings under one identifier keep
/// the order they were inserted in.
#[derive(Debug, Default, Clone)]
pub struct IdentifierMap {
    order: Vec<String>,
    groups: HashMap<String, Vec<Filing>>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lei: String, filing: Filing) {
        match self.groups.get_mut(&lei) {
            Some(filings) => filings.push(filing),
            None => {
                self.order.push(lei.clone());
                self.groups.insert(lei, vec![filing]);
            }
        }
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of filings across all identifiers.
    pub fn filing_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn get(&self, lei: &str) -> Option<&[Filing]> {
        self.groups.get(lei).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Filing])> + '_ {
        self.order
            .iter()
            .filter_map(move |lei| self.get(lei).map(|filings| (lei.as_str(), filings)))
    }

    /// Every filing, identifier by identifier, in insertion order.
    ///
    /// No filing is dropped: entities that publish several language variants
    /// keep all of them.
    pub fn flatten(mut self) -> Vec<Filing> {
        let mut out = Vec::with_capacity(self.filing_count());
        for lei in &self.order {
            if let Some(filings) = self.groups.remove(lei) {
                out.extend(filings);
            }
        }
        out
    }
}
