//! Encrypted item vault: the XOR stream cipher and the secure item store.
//!
//! Items carry notes or photo data URIs encrypted with a per-item password.
//! The vault never exposes plaintext itself; session crates decrypt through
//! [`cipher`] after their own password checks pass.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cipher;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Payload class of a secure item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecureItemKind {
    /// Encrypted text note.
    Note,
    /// Encrypted photo stored as a data URI.
    Photo,
}

/// One encrypted vault entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureItem {
    /// Stable item identifier.
    pub id: String,
    /// Display name, unique within the vault ignoring ASCII case.
    pub name: String,
    /// Payload class.
    #[serde(rename = "type")]
    pub kind: SecureItemKind,
    /// Whether the item is currently locked.
    pub is_locked: bool,
    /// Item password. `None` until first provisioned; an unprovisioned item
    /// behaves as locked.
    pub password: Option<String>,
    /// Encrypted note body.
    #[serde(default)]
    pub encrypted_content: String,
    /// Encrypted photo data URI.
    #[serde(default)]
    pub encrypted_image_data_uri: String,
}

impl SecureItem {
    /// Creates a locked, unprovisioned item with empty payloads.
    pub fn new(name: impl Into<String>, kind: SecureItemKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            is_locked: true,
            password: None,
            encrypted_content: String::new(),
            encrypted_image_data_uri: String::new(),
        }
    }
}

/// Error raised by vault mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// An item with the same case-insensitive name already exists.
    #[error("An item with this name already exists.")]
    DuplicateName,
    /// No item carries the given id.
    #[error("secure item not found")]
    ItemNotFound,
}

/// In-memory vault with case-insensitive unique names.
///
/// Insertion order is preserved; snapshots serialize as a plain item array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultStore {
    items: Vec<SecureItem>,
}

impl VaultStore {
    /// Builds a vault from persisted items, dropping later duplicates of a
    /// case-insensitive name so the uniqueness invariant holds on load.
    pub fn from_items(items: Vec<SecureItem>) -> Self {
        let mut vault = Self::default();
        for item in items {
            let _ = vault.insert(item);
        }
        vault
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[SecureItem] {
        &self.items
    }

    /// Whether a name is already taken, ignoring ASCII case.
    pub fn contains_name(&self, name: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Looks an item up by name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&SecureItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Looks an item up by id.
    pub fn find_by_id(&self, id: &str) -> Option<&SecureItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Mutable lookup by id.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut SecureItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Inserts a new item.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::DuplicateName`] when the name is taken.
    pub fn insert(&mut self, item: SecureItem) -> Result<(), VaultError> {
        if self.contains_name(&item.name) {
            return Err(VaultError::DuplicateName);
        }
        self.items.push(item);
        Ok(())
    }

    /// Finds an item by name or creates an unprovisioned one.
    ///
    /// Returns the item id and whether it was newly created.
    pub fn find_or_create(&mut self, name: &str, kind: SecureItemKind) -> (String, bool) {
        if let Some(existing) = self.find_by_name(name) {
            return (existing.id.clone(), false);
        }
        let item = SecureItem::new(name, kind);
        let id = item.id.clone();
        self.items.push(item);
        (id, true)
    }
}
