//! Validated create, edit and delete helpers for ledger entries.

use tracing::info;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::entry::{EntryDraft, LedgerEntry};
use crate::errors::LedgerError;
use crate::ledger::{CollectionKind, Ledger};

pub struct EntryService;

impl EntryService {
    /// Validates `draft` and appends it, returning the new identifier.
    pub fn add(ledger: &mut Ledger, kind: CollectionKind, draft: &EntryDraft) -> ServiceResult<u32> {
        let valid = draft.validate(kind.type_policy())?;
        let id = ledger.collection_mut(kind).insert(valid);
        info!(collection = %kind, id, "entry added");
        Ok(id)
    }

    /// Replaces the fields of entry `id`; the entry keeps its identifier.
    pub fn edit(
        ledger: &mut Ledger,
        kind: CollectionKind,
        id: u32,
        draft: &EntryDraft,
    ) -> ServiceResult<()> {
        let valid = draft.validate(kind.type_policy())?;
        ledger
            .collection_mut(kind)
            .replace(id, valid)
            .ok_or(LedgerError::EntryNotFound { collection: kind, id })?;
        info!(collection = %kind, id, "entry updated");
        Ok(())
    }

    /// Removes entry `id` and renumbers the survivors.
    pub fn remove(ledger: &mut Ledger, kind: CollectionKind, id: u32) -> ServiceResult<LedgerEntry> {
        let removed = ledger
            .collection_mut(kind)
            .remove(id)
            .ok_or(LedgerError::EntryNotFound { collection: kind, id })?;
        info!(collection = %kind, id, entry = %removed.label(), "entry removed");
        Ok(removed)
    }

    pub fn get(ledger: &Ledger, kind: CollectionKind, id: u32) -> ServiceResult<&LedgerEntry> {
        ledger
            .collection(kind)
            .get(id)
            .ok_or(ServiceError::Ledger(LedgerError::EntryNotFound {
                collection: kind,
                id,
            }))
    }

    /// Entries in display order (by identifier).
    pub fn list(ledger: &Ledger, kind: CollectionKind) -> Vec<&LedgerEntry> {
        ledger.collection(kind).iter().collect()
    }

    /// Pre-fills a draft from an existing entry, for edit forms.
    pub fn draft_from(entry: &LedgerEntry) -> EntryDraft {
        let mut draft = EntryDraft::new(
            entry.kind.as_str(),
            entry.amount.to_string(),
            entry.category.clone(),
            entry.date.format(crate::domain::entry::DATE_FORMAT).to_string(),
        );
        if let Some(notes) = &entry.notes {
            draft = draft.with_notes(notes.clone());
        }
        if let Some(recurring) = entry.recurring {
            draft = draft.with_recurring(recurring.as_str());
        }
        draft
    }
}
