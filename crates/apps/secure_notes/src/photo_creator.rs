//! Secure-photo creator phase machine.

use secure_vault::{cipher, SecureItem, SecureItemKind, VaultStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image size ceiling for attached photos, 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Where the creator currently sits in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCreatorPhase {
    /// Waiting for an image to be attached.
    AwaitingImage,
    /// Image accepted; waiting for a password.
    AwaitingPassword,
    /// Save in flight.
    Saving,
}

/// Failure surfaced in the creator window's error field.
///
/// The display strings are part of the observable contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhotoSaveError {
    /// Name, image, or password missing at save time.
    #[error("Missing name, image, or password.")]
    MissingFields,
    /// The vault already holds an item with this name.
    #[error("An item with this name already exists.")]
    DuplicateName,
    /// Attached image has a disallowed content type.
    #[error("Pasted image has an invalid file type (JPEG, PNG, WebP only).")]
    InvalidImageType,
    /// Attached image exceeds [`MAX_IMAGE_BYTES`].
    #[error("Pasted image is too large (Max 5MB).")]
    ImageTooLarge,
}

/// Secure-photo creator window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCreatorState {
    /// Current phase.
    pub status: PhotoCreatorPhase,
    /// Target vault item name.
    pub note_name: String,
    /// Password being typed.
    pub password_attempt: String,
    /// Window-scoped error line.
    pub error: Option<String>,
    /// Preview URL of the attached image.
    pub image_preview_url: Option<String>,
    /// Raw data URI of the attached image.
    pub image_data: Option<String>,
}

impl PhotoCreatorState {
    /// Creates a fresh creator for the given item name.
    pub fn new(note_name: impl Into<String>) -> Self {
        Self {
            status: PhotoCreatorPhase::AwaitingImage,
            note_name: note_name.into(),
            password_attempt: String::new(),
            error: None,
            image_preview_url: None,
            image_data: None,
        }
    }

    /// Attaches an image, advancing to the password phase when it passes the
    /// type and size checks.
    ///
    /// # Errors
    ///
    /// Rejections leave the phase unchanged and mirror the error into
    /// [`Self::error`].
    pub fn attach_image(
        &mut self,
        data_uri: impl Into<String>,
        mime_type: &str,
        size_bytes: usize,
    ) -> Result<(), PhotoSaveError> {
        let result = if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime_type) {
            Err(PhotoSaveError::InvalidImageType)
        } else if size_bytes > MAX_IMAGE_BYTES {
            Err(PhotoSaveError::ImageTooLarge)
        } else {
            Ok(())
        };
        if let Err(err) = &result {
            self.error = Some(err.to_string());
            return result;
        }
        let data_uri = data_uri.into();
        self.image_preview_url = Some(data_uri.clone());
        self.image_data = Some(data_uri);
        self.status = PhotoCreatorPhase::AwaitingPassword;
        self.error = None;
        result
    }

    /// Records password keystrokes, clearing any stale error.
    pub fn set_password_attempt(&mut self, attempt: impl Into<String>) {
        self.password_attempt = attempt.into();
        self.error = None;
    }

    /// Encrypts the attached image and stores it as a locked vault item.
    ///
    /// On success the new item's id is returned and the caller removes the
    /// creator window. On failure the phase reverts to awaiting-password
    /// with the error mirrored into [`Self::error`].
    ///
    /// # Errors
    ///
    /// Missing fields, a duplicate name, or a vault rejection.
    pub fn save_into(&mut self, vault: &mut VaultStore) -> Result<String, PhotoSaveError> {
        let password = self.password_attempt.clone();
        let Some(image_data) = self.image_data.clone().filter(|d| !d.is_empty()) else {
            return self.fail(PhotoSaveError::MissingFields);
        };
        if self.note_name.is_empty() || password.is_empty() {
            return self.fail(PhotoSaveError::MissingFields);
        }
        if vault.contains_name(&self.note_name) {
            return self.fail(PhotoSaveError::DuplicateName);
        }

        self.status = PhotoCreatorPhase::Saving;
        let mut item = SecureItem::new(self.note_name.clone(), SecureItemKind::Photo);
        item.password = Some(password.clone());
        item.encrypted_image_data_uri = cipher::encrypt(&image_data, &password);
        let id = item.id.clone();
        match vault.insert(item) {
            Ok(()) => Ok(id),
            Err(_) => self.fail(PhotoSaveError::DuplicateName),
        }
    }

    fn fail(&mut self, err: PhotoSaveError) -> Result<String, PhotoSaveError> {
        if self.status == PhotoCreatorPhase::Saving {
            self.status = PhotoCreatorPhase::AwaitingPassword;
        }
        self.error = Some(err.to_string());
        Err(err)
    }
}
