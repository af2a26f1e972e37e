pub mod entry;

pub use entry::{EntryDraft, EntryType, LedgerEntry, Recurring};
