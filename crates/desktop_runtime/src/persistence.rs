//! Durable-state wiring: typed per-domain load and save over the host
//! [`StateStore`], with per-domain fallback on corrupt values at startup.

use gamification::{default_achievements, Achievement, GamificationState, Progression, Quest};
use platform_host::{StateDomain, StateStore};
use secure_vault::{SecureItem, VaultStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::engine::DesktopState;
use crate::model::WindowCollection;

async fn load_or_default<T, S, F>(store: &S, domain: StateDomain, fallback: F) -> T
where
    T: DeserializeOwned,
    S: StateStore + ?Sized,
    F: FnOnce() -> T,
{
    let raw = match store.load(domain).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback(),
        Err(err) => {
            log::warn!("discarding corrupt state under {}: {err}", domain.key());
            return fallback();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("discarding corrupt state under {}: {err}", domain.key());
            fallback()
        }
    }
}

async fn save_domain<S, T>(store: &S, domain: StateDomain, value: &T) -> Result<(), String>
where
    S: StateStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save(domain, &raw).await
}

/// Loads the whole desktop from the store.
///
/// Every domain loads independently; a missing or corrupt value falls back to
/// that domain's default without touching the others. Never fails.
pub async fn load_desktop_state<S: StateStore + ?Sized>(store: &S) -> DesktopState {
    let windows: WindowCollection =
        load_or_default(store, StateDomain::Windows, WindowCollection::default).await;
    let items: Vec<SecureItem> = load_or_default(store, StateDomain::Vault, Vec::new).await;
    let state: GamificationState =
        load_or_default(store, StateDomain::Progression, GamificationState::default).await;
    let quests: Vec<Quest> = load_or_default(store, StateDomain::Quests, Vec::new).await;
    let achievements: Vec<Achievement> =
        load_or_default(store, StateDomain::Achievements, default_achievements).await;

    DesktopState {
        windows,
        vault: VaultStore::from_items(items),
        progression: Progression {
            state,
            quests,
            achievements,
        },
        clipboard: None,
        active_stream: None,
    }
}

/// Saves the window collection.
///
/// # Errors
///
/// Propagates store and serialization failures as strings.
pub async fn save_windows<S: StateStore + ?Sized>(
    store: &S,
    windows: &WindowCollection,
) -> Result<(), String> {
    save_domain(store, StateDomain::Windows, windows).await
}

/// Saves the secure vault.
///
/// # Errors
///
/// Propagates store and serialization failures as strings.
pub async fn save_vault<S: StateStore + ?Sized>(
    store: &S,
    vault: &VaultStore,
) -> Result<(), String> {
    save_domain(store, StateDomain::Vault, vault).await
}

/// Saves progression state, quests, and achievements under their own domains.
///
/// # Errors
///
/// Propagates the first store or serialization failure.
pub async fn save_progression<S: StateStore + ?Sized>(
    store: &S,
    progression: &Progression,
) -> Result<(), String> {
    save_domain(store, StateDomain::Progression, &progression.state).await?;
    save_domain(store, StateDomain::Quests, &progression.quests).await?;
    save_domain(store, StateDomain::Achievements, &progression.achievements).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryStateStore, NoopStateStore, RecordingMediaCaptureService};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::engine::apply_commands;
    use crate::model::WindowKind;

    use super::*;

    fn populated_state() -> DesktopState {
        let mut state = DesktopState::default();
        let media = RecordingMediaCaptureService::default();
        let commands = [
            serde_json::from_value(json!({
                "action": "CREATE",
                "elementType": "window",
                "spec": { "id": "b1", "windowType": "browser" }
            }))
            .expect("command"),
            serde_json::from_value(json!({
                "action": "CREATE",
                "elementType": "window",
                "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
            }))
            .expect("command"),
        ];
        block_on(apply_commands(&mut state, &commands, &media));
        state
    }

    #[test]
    fn fresh_store_yields_a_default_desktop() {
        let state = block_on(load_desktop_state(&NoopStateStore));
        assert!(state.windows.is_empty());
        assert!(state.vault.items().is_empty());
        assert_eq!(state.progression.state.level, 1);
        assert_eq!(state.progression.achievements.len(), 4);
    }

    #[test]
    fn desktop_round_trips_through_the_store() {
        let store = MemoryStateStore::default();
        let mut state = populated_state();
        state.progression.state.xp = 120.0;

        block_on(save_windows(&store, &state.windows)).expect("save windows");
        block_on(save_vault(&store, &state.vault)).expect("save vault");
        block_on(save_progression(&store, &state.progression)).expect("save progression");

        let loaded = block_on(load_desktop_state(&store));
        assert_eq!(loaded.windows.len(), 2);
        assert_eq!(loaded.windows.get("b1").expect("window").kind, WindowKind::Browser);
        assert_eq!(loaded.vault.items().len(), 1);
        assert_eq!(loaded.vault.items()[0].name, "Journal");
        assert_eq!(loaded.progression.state.xp, 120.0);
        assert_eq!(loaded.clipboard, None);
        assert_eq!(loaded.active_stream, None);
    }

    #[test]
    fn corrupt_domain_falls_back_without_poisoning_the_rest() {
        let store = MemoryStateStore::default();
        let state = populated_state();
        block_on(save_vault(&store, &state.vault)).expect("save vault");
        store.seed(StateDomain::Windows, "{definitely not json");

        let loaded = block_on(load_desktop_state(&store));
        assert!(loaded.windows.is_empty());
        assert_eq!(loaded.vault.items().len(), 1);
    }

    #[test]
    fn type_mismatched_domain_falls_back_to_its_default() {
        let store = MemoryStateStore::default();
        // Valid JSON, wrong shape for the progression state.
        store.seed(StateDomain::Progression, "\"not an object\"");

        let loaded = block_on(load_desktop_state(&store));
        assert_eq!(loaded.progression.state.level, 1);
        assert_eq!(loaded.progression.state.xp, 0.0);
    }

    #[test]
    fn note_window_binding_survives_a_reload() {
        let store = MemoryStateStore::default();
        let state = populated_state();
        block_on(save_windows(&store, &state.windows)).expect("save windows");
        block_on(save_vault(&store, &state.vault)).expect("save vault");

        let loaded = block_on(load_desktop_state(&store));
        let note_window = loaded
            .windows
            .iter()
            .find(|w| w.kind == WindowKind::EncryptedNote)
            .expect("note window");
        let note_id = note_window.note_id.as_deref().expect("note id");
        assert!(loaded.vault.find_by_id(note_id).is_some());
    }
}
