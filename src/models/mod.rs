mod entry;

pub use entry::{Amount, EntryKind, LedgerEntry, NewEntry};
