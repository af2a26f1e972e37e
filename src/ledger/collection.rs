use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entry::{LedgerEntry, TypePolicy, ValidEntry};

/// The two entry collections kept by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Budget,
    Expense,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Budget, CollectionKind::Expense];

    /// Name of the persisted blob holding this collection.
    pub fn storage_key(&self) -> &'static str {
        match self {
            CollectionKind::Budget => "budgetEntries",
            CollectionKind::Expense => "expenseEntries",
        }
    }

    pub fn type_policy(&self) -> TypePolicy {
        match self {
            CollectionKind::Budget => TypePolicy::BudgetKinds,
            CollectionKind::Expense => TypePolicy::AnyLabel,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Budget => f.write_str("budget"),
            CollectionKind::Expense => f.write_str("expense"),
        }
    }
}

/// Ordered entries whose identifiers always run 1..=len.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCollection {
    kind: CollectionKind,
    entries: Vec<LedgerEntry>,
}

impl EntryCollection {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Builds a collection from stored rows, restoring dense identifiers.
    pub fn from_entries(kind: CollectionKind, entries: Vec<LedgerEntry>) -> Self {
        let mut collection = Self { kind, entries };
        collection.renumber();
        collection
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: u32) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Appends a validated entry and returns the identifier it received.
    pub fn insert(&mut self, entry: ValidEntry) -> u32 {
        let id = self.next_id();
        self.entries.push(entry.into_entry(id));
        id
    }

    /// Overwrites the entry with `id` in place, keeping its identifier.
    pub fn replace(&mut self, id: u32, entry: ValidEntry) -> Option<&LedgerEntry> {
        let slot = self.entries.iter_mut().find(|existing| existing.id == id)?;
        *slot = entry.into_entry(id);
        Some(&*slot)
    }

    /// Removes the entry with `id` and renumbers the survivors.
    pub fn remove(&mut self, id: u32) -> Option<LedgerEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn ids_are_dense(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, entry)| entry.id as usize == index + 1)
    }

    fn next_id(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.id = index as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::EntryDraft;

    fn valid(kind: &str, amount: &str, date: &str) -> ValidEntry {
        EntryDraft::new(kind, amount, "General", date)
            .validate(TypePolicy::AnyLabel)
            .unwrap()
    }

    #[test]
    fn insert_assigns_next_identifier() {
        let mut collection = EntryCollection::new(CollectionKind::Expense);
        assert_eq!(collection.insert(valid("Needs", "10", "2024-01-01")), 1);
        assert_eq!(collection.insert(valid("Wants", "5", "2024-01-02")), 2);
        assert!(collection.ids_are_dense());
    }

    #[test]
    fn remove_renumbers_remaining_entries() {
        let mut collection = EntryCollection::new(CollectionKind::Budget);
        for day in 1..=4 {
            collection.insert(valid("Income", "100", &format!("2024-01-0{day}")));
        }
        let removed = collection.remove(2).unwrap();
        assert_eq!(removed.date.to_string(), "2024-01-02");
        assert_eq!(collection.len(), 3);
        assert!(collection.ids_are_dense());
        assert_eq!(collection.get(2).unwrap().date.to_string(), "2024-01-03");
        assert_eq!(collection.insert(valid("Income", "1", "2024-02-01")), 4);
    }

    #[test]
    fn remove_and_replace_miss_unknown_ids() {
        let mut collection = EntryCollection::new(CollectionKind::Budget);
        collection.insert(valid("Income", "100", "2024-01-01"));
        assert!(collection.remove(7).is_none());
        assert!(collection
            .replace(9, valid("Needs", "1", "2024-01-01"))
            .is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn replace_keeps_identifier() {
        let mut collection = EntryCollection::new(CollectionKind::Budget);
        collection.insert(valid("Income", "100", "2024-01-01"));
        collection.insert(valid("Needs", "40", "2024-01-02"));
        let updated = collection
            .replace(2, valid("Wants", "55", "2024-01-03"))
            .unwrap();
        assert_eq!(updated.id, 2);
        assert_eq!(updated.amount, 55.0);
    }
}
