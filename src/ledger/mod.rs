//! Ledger collections: dense-id entry lists for budget and expense rows.

pub mod book;
pub mod collection;

pub use book::Ledger;
pub use collection::{CollectionKind, EntryCollection};
