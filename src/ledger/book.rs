use super::collection::{CollectionKind, EntryCollection};

/// Budget and expense collections held by a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub budget: EntryCollection,
    pub expenses: EntryCollection,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            budget: EntryCollection::new(CollectionKind::Budget),
            expenses: EntryCollection::new(CollectionKind::Expense),
        }
    }

    pub fn collection(&self, kind: CollectionKind) -> &EntryCollection {
        match kind {
            CollectionKind::Budget => &self.budget,
            CollectionKind::Expense => &self.expenses,
        }
    }

    pub fn collection_mut(&mut self, kind: CollectionKind) -> &mut EntryCollection {
        match kind {
            CollectionKind::Budget => &mut self.budget,
            CollectionKind::Expense => &mut self.expenses,
        }
    }

    pub fn set_collection(&mut self, collection: EntryCollection) {
        let kind = collection.kind();
        *self.collection_mut(kind) = collection;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::EntryDraft;

    #[test]
    fn set_collection_replaces_matching_kind() {
        let mut ledger = Ledger::new();
        let mut expenses = EntryCollection::new(CollectionKind::Expense);
        let entry = EntryDraft::new("Groceries", "42.5", "Food", "2024-02-01")
            .validate(CollectionKind::Expense.type_policy())
            .unwrap();
        expenses.insert(entry);

        ledger.set_collection(expenses);
        assert_eq!(ledger.collection(CollectionKind::Expense).len(), 1);
        assert!(ledger.collection(CollectionKind::Budget).is_empty());
    }
}
