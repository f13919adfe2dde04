//! Password-gated note operations over vault items.

use secure_vault::{cipher, SecureItemKind, VaultStore};
use thiserror::Error;

/// One encrypted-note interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    /// Provision the item's password with the current attempt.
    SetPassword,
    /// Unlock with the current attempt.
    Unlock,
    /// Lock the item again.
    Lock,
}

impl NoteAction {
    /// Parses a namespaced action token off the wire.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "encrypted-note:set_password" => Some(Self::SetPassword),
            "encrypted-note:unlock" => Some(Self::Unlock),
            "encrypted-note:lock" => Some(Self::Lock),
            _ => None,
        }
    }
}

/// Authentication failure surfaced in the window's error field.
///
/// The display strings are part of the observable contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteSessionError {
    /// Empty password attempt on set-password or unlock.
    #[error("Password cannot be empty.")]
    EmptyPassword,
    /// The attempt did not match the provisioned password.
    #[error("Incorrect password.")]
    IncorrectPassword,
    /// The window references an item the vault no longer holds.
    #[error("secure item not found")]
    ItemNotFound,
}

/// Applies a note action to the vault item backing a window.
///
/// `SetPassword` and `Unlock` share semantics: an unprovisioned note-kind
/// item adopts the attempt as its password and unlocks; photo-kind items can
/// only be provisioned through the photo creator, so the attempt is ignored
/// for them. A provisioned item unlocks only on an exact match.
///
/// # Errors
///
/// Returns the window-facing error; the item is unchanged on failure.
pub fn apply_note_action(
    vault: &mut VaultStore,
    note_id: &str,
    action: NoteAction,
    password_attempt: &str,
) -> Result<(), NoteSessionError> {
    let item = vault
        .find_by_id_mut(note_id)
        .ok_or(NoteSessionError::ItemNotFound)?;

    match action {
        NoteAction::SetPassword | NoteAction::Unlock => {
            if password_attempt.is_empty() {
                return Err(NoteSessionError::EmptyPassword);
            }
            match &item.password {
                None => {
                    if item.kind == SecureItemKind::Note {
                        item.password = Some(password_attempt.to_string());
                        item.is_locked = false;
                    }
                }
                Some(password) => {
                    if password_attempt == password {
                        item.is_locked = false;
                    } else {
                        return Err(NoteSessionError::IncorrectPassword);
                    }
                }
            }
        }
        NoteAction::Lock => item.is_locked = true,
    }
    Ok(())
}

fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Replaces an unlocked note's content, re-encrypting immediately.
///
/// Returns the number of words added when the edit grew the text, `0`
/// otherwise. Locked, unprovisioned, or photo-kind items ignore the edit.
///
/// # Errors
///
/// Returns [`NoteSessionError::ItemNotFound`] for a dangling item id.
pub fn edit_note_content(
    vault: &mut VaultStore,
    note_id: &str,
    new_content: &str,
) -> Result<u64, NoteSessionError> {
    let item = vault
        .find_by_id_mut(note_id)
        .ok_or(NoteSessionError::ItemNotFound)?;
    if item.kind != SecureItemKind::Note || item.is_locked {
        return Ok(0);
    }
    let Some(password) = item.password.clone() else {
        return Ok(0);
    };

    let old_content = cipher::decrypt(&item.encrypted_content, &password);
    item.encrypted_content = cipher::encrypt(new_content, &password);

    let words_added = word_count(new_content).saturating_sub(word_count(&old_content));
    Ok(words_added)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use secure_vault::SecureItem;

    use super::*;

    fn vault_with(item: SecureItem) -> (VaultStore, String) {
        let id = item.id.clone();
        let mut vault = VaultStore::default();
        vault.insert(item).expect("insert");
        (vault, id)
    }

    #[test]
    fn first_unlock_provisions_a_note_password() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        apply_note_action(&mut vault, &id, NoteAction::Unlock, "hunter2").expect("unlock");
        let item = vault.find_by_id(&id).expect("item");
        assert_eq!(item.password.as_deref(), Some("hunter2"));
        assert!(!item.is_locked);
    }

    #[test]
    fn unprovisioned_photo_ignores_the_attempt() {
        let (mut vault, id) = vault_with(SecureItem::new("Pic", SecureItemKind::Photo));
        apply_note_action(&mut vault, &id, NoteAction::SetPassword, "hunter2").expect("no-op");
        let item = vault.find_by_id(&id).expect("item");
        assert_eq!(item.password, None);
        assert!(item.is_locked);
    }

    #[test]
    fn empty_attempt_is_rejected() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        assert_eq!(
            apply_note_action(&mut vault, &id, NoteAction::Unlock, ""),
            Err(NoteSessionError::EmptyPassword)
        );
    }

    #[test]
    fn wrong_password_leaves_the_item_locked() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        apply_note_action(&mut vault, &id, NoteAction::Unlock, "right").expect("provision");
        apply_note_action(&mut vault, &id, NoteAction::Lock, "").expect("lock");
        assert_eq!(
            apply_note_action(&mut vault, &id, NoteAction::Unlock, "wrong"),
            Err(NoteSessionError::IncorrectPassword)
        );
        assert!(vault.find_by_id(&id).expect("item").is_locked);
    }

    #[test]
    fn lock_always_succeeds() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        apply_note_action(&mut vault, &id, NoteAction::Unlock, "pw").expect("unlock");
        apply_note_action(&mut vault, &id, NoteAction::Lock, "ignored").expect("lock");
        assert!(vault.find_by_id(&id).expect("item").is_locked);
    }

    #[test]
    fn edits_reencrypt_and_report_added_words() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        apply_note_action(&mut vault, &id, NoteAction::Unlock, "pw").expect("unlock");

        let added = edit_note_content(&mut vault, &id, "hello brave new world").expect("edit");
        assert_eq!(added, 4);

        let item = vault.find_by_id(&id).expect("item");
        assert_ne!(item.encrypted_content, "hello brave new world");
        assert_eq!(
            cipher::decrypt(&item.encrypted_content, "pw"),
            "hello brave new world"
        );
    }

    #[test]
    fn shrinking_edits_report_zero_words() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        apply_note_action(&mut vault, &id, NoteAction::Unlock, "pw").expect("unlock");
        edit_note_content(&mut vault, &id, "one two three").expect("edit");
        assert_eq!(edit_note_content(&mut vault, &id, "one").expect("edit"), 0);
    }

    #[test]
    fn locked_items_ignore_edits() {
        let (mut vault, id) = vault_with(SecureItem::new("Journal", SecureItemKind::Note));
        assert_eq!(edit_note_content(&mut vault, &id, "text").expect("edit"), 0);
        assert_eq!(vault.find_by_id(&id).expect("item").encrypted_content, "");
    }

    #[test]
    fn action_tokens_parse() {
        assert_eq!(
            NoteAction::from_token("encrypted-note:unlock"),
            Some(NoteAction::Unlock)
        );
        assert_eq!(NoteAction::from_token("encrypted-note:share"), None);
    }
}
