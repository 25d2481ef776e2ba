//! Persistence slots
//!
//! A slot is a single named key-value entry holding the store's whole state
//! as one JSON document. The store writes it wholesale after every mutation
//! and reads it wholesale once at startup; a missing or unreadable slot
//! degrades to empty state rather than an error.

use std::{
    fmt::Debug,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    customers::Customer,
    products::Product,
    sales::{Sale, SaleLineItem},
};

/// Errors raised by a persistence slot.
///
/// The store treats all of these as non-fatal: it logs and carries on
/// without persistence.
#[derive(Debug, Error)]
pub enum SlotError {
    /// The underlying medium could not be read or written.
    #[error("slot io error")]
    Io(#[from] io::Error),
}

/// A single key-value entry the store mirrors its full state into.
pub trait SnapshotSlot: Debug {
    /// Reads the raw slot contents, `None` if the slot has never been
    /// written.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the medium cannot be read.
    fn load(&self) -> Result<Option<String>, SlotError>;

    /// Overwrites the slot contents wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the medium cannot be written.
    fn save(&self, raw: &str) -> Result<(), SlotError>;

    /// Deletes the slot entry.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the medium cannot be written.
    fn clear(&self) -> Result<(), SlotError>;
}

/// Serialized form of the store's full state.
///
/// The id counters ride along with the record arrays so identifier
/// assignment stays monotonic across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All registered customers
    pub customers: Vec<Customer>,

    /// The product catalogue
    pub products: Vec<Product>,

    /// All recorded sales
    pub sales: Vec<Sale>,

    /// All recorded sale line items
    pub line_items: Vec<SaleLineItem>,

    /// Next customer id to assign
    pub next_customer_id: u32,

    /// Next product id to assign
    pub next_product_id: u32,

    /// Next sale id to assign
    pub next_sale_id: u32,
}

/// The "no persistence medium" slot: loads nothing, stores nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSlot;

impl SnapshotSlot for NullSlot {
    fn load(&self) -> Result<Option<String>, SlotError> {
        Ok(None)
    }

    fn save(&self, _raw: &str) -> Result<(), SlotError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        Ok(())
    }
}

/// A slot backed by a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    /// Creates a slot at the given path. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSlot for JsonFileSlot {
    fn load(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(SlotError::Io(error)),
        }
    }

    fn save(&self, raw: &str) -> Result<(), SlotError> {
        fs::write(&self.path, raw)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SlotError::Io(error)),
        }
    }
}

/// An in-process slot holding the serialized state in a shared cell.
///
/// Clones share the same cell, so a test can keep a handle to observe what
/// the store mirrored, or seed the cell before handing it over.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    cell: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw slot contents, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the raw slot contents, bypassing the store.
    pub fn seed(&self, raw: impl Into<String>) {
        *self.cell.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.into());
    }
}

impl SnapshotSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, SlotError> {
        Ok(self.raw())
    }

    fn save(&self, raw: &str) -> Result<(), SlotError> {
        *self.cell.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.to_owned());

        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        *self.cell.lock().unwrap_or_else(PoisonError::into_inner) = None;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn null_slot_loads_nothing() -> TestResult {
        let slot = NullSlot;

        slot.save("{}")?;
        assert_eq!(slot.load()?, None);

        Ok(())
    }

    #[test]
    fn memory_slot_round_trips_and_clears() -> TestResult {
        let slot = MemorySlot::new();
        let handle = slot.clone();

        assert_eq!(slot.load()?, None);

        slot.save(r#"{"customers":[]}"#)?;
        assert_eq!(handle.raw().as_deref(), Some(r#"{"customers":[]}"#));

        slot.clear()?;
        assert_eq!(handle.load()?, None);

        Ok(())
    }

    #[test]
    fn file_slot_missing_file_is_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let slot = JsonFileSlot::new(dir.path().join("till.json"));

        assert_eq!(slot.load()?, None);

        // Clearing a slot that was never written is not an error.
        slot.clear()?;

        Ok(())
    }

    #[test]
    fn file_slot_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("till.json");
        let slot = JsonFileSlot::new(&path);

        slot.save("{\"sales\":[]}")?;
        assert_eq!(slot.load()?.as_deref(), Some("{\"sales\":[]}"));

        slot.clear()?;
        assert!(!path.exists(), "clear should remove the slot file");

        Ok(())
    }
}
