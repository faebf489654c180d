//! Account mapping between feed accounts and ledger accounts

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One-to-one pairing of feed account ids to ledger account ids
///
/// Owned and loaded by configuration; the mapper only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountMap {
    entries: HashMap<String, String>,
}

impl AccountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger account id for a feed account, if mapped
    pub fn ledger_account(&self, source_account_id: &str) -> Option<&str> {
        self.entries.get(source_account_id).map(String::as_str)
    }

    pub fn insert(
        &mut self,
        source_account_id: impl Into<String>,
        ledger_account_id: impl Into<String>,
    ) {
        self.entries
            .insert(source_account_id.into(), ledger_account_id.into());
    }

    pub fn remove(&mut self, source_account_id: &str) -> Option<String> {
        self.entries.remove(source_account_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, l)| (s.as_str(), l.as_str()))
    }
}

impl FromIterator<(String, String)> for AccountMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut map = AccountMap::new();
        map.insert("feed-1", "A1");

        assert_eq!(map.ledger_account("feed-1"), Some("A1"));
        assert_eq!(map.ledger_account("feed-2"), None);
    }

    #[test]
    fn test_remove() {
        let mut map = AccountMap::new();
        map.insert("feed-1", "A1");

        assert_eq!(map.remove("feed-1"), Some("A1".to_string()));
        assert!(map.is_empty());
    }
}
