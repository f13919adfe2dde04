//! Lightweight desktop snapshot sent along with every assistant prompt.
//!
//! The snapshot deliberately excludes window geometry, component trees, and
//! anything secret: vault items appear as name and kind only, never content
//! or passwords.

use serde::Serialize;

use crate::engine::DesktopState;
use crate::model::{WindowRecord, WindowState};

/// One window as the assistant sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    /// Window id, usable as a command target.
    pub id: String,
    /// Title-bar text.
    pub title: String,
    /// Window kind token.
    pub window_type: String,
    /// Whether the window is currently hidden.
    pub is_hidden: bool,
    /// Backing vault item id for note windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    /// Backing vault item name for note windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    /// Translator source language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_lang: Option<String>,
    /// Translator target language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_lang: Option<String>,
    /// File-cabinet search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl WindowSummary {
    fn from_record(window: &WindowRecord) -> Self {
        let (from_lang, to_lang) = match &window.state {
            WindowState::Translator(translator) => (
                Some(translator.from_lang.clone()),
                Some(translator.to_lang.clone()),
            ),
            _ => (None, None),
        };
        let search_term = match &window.state {
            WindowState::FileCabinet(cabinet) => Some(cabinet.search_term.clone()),
            _ => None,
        };
        Self {
            id: window.id.clone(),
            title: window.title.clone(),
            window_type: window.kind.as_token(),
            is_hidden: window.is_hidden,
            note_id: window.note_id.clone(),
            note_name: window.note_name.clone(),
            from_lang,
            to_lang,
            search_term,
        }
    }
}

/// One vault item as the assistant sees it: existence only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureItemSummary {
    /// Item name.
    pub name: String,
    /// Item kind token, `note` or `photo`.
    #[serde(rename = "type")]
    pub kind: secure_vault::SecureItemKind,
}

/// The complete snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    /// Open and hidden windows.
    pub windows: Vec<WindowSummary>,
    /// Vault inventory, names and kinds only.
    pub secure_items: Vec<SecureItemSummary>,
    /// Level, XP, and activity counters.
    pub gamification: gamification::GamificationState,
    /// Titles of quests not yet completed.
    pub active_quests: Vec<String>,
    /// Titles of unlocked achievements.
    pub unlocked_achievements: Vec<String>,
}

impl AssistantContext {
    /// Builds the snapshot for the current desktop.
    pub fn build(state: &DesktopState) -> Self {
        Self {
            windows: state.windows.iter().map(WindowSummary::from_record).collect(),
            secure_items: state
                .vault
                .items()
                .iter()
                .map(|item| SecureItemSummary {
                    name: item.name.clone(),
                    kind: item.kind,
                })
                .collect(),
            gamification: state.progression.state.clone(),
            active_quests: state
                .progression
                .quests
                .iter()
                .filter(|quest| !quest.completed)
                .map(|quest| quest.title.clone())
                .collect(),
            unlocked_achievements: state
                .progression
                .achievements
                .iter()
                .filter(|achievement| achievement.unlocked)
                .map(|achievement| achievement.title.clone())
                .collect(),
        }
    }

    /// Renders the snapshot as the JSON string embedded in prompts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::RecordingMediaCaptureService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::engine::apply_commands;

    use super::*;

    fn apply(state: &mut DesktopState, raw: serde_json::Value) {
        let media = RecordingMediaCaptureService::default();
        let command = serde_json::from_value(raw).expect("command");
        block_on(apply_commands(state, &[command], &media));
    }

    #[test]
    fn snapshot_lists_windows_without_geometry_or_components() {
        let mut state = DesktopState::default();
        apply(
            &mut state,
            json!({
                "action": "CREATE",
                "elementType": "window",
                "spec": {
                    "id": "tr",
                    "windowType": "translator",
                    "components": [{ "id": "in", "type": "input" }]
                }
            }),
        );
        let context = AssistantContext::build(&state);
        assert_eq!(context.windows.len(), 1);
        assert_eq!(context.windows[0].window_type, "translator");
        assert_eq!(context.windows[0].from_lang.as_deref(), Some("en"));
        assert_eq!(context.windows[0].to_lang.as_deref(), Some("es"));

        let value = serde_json::to_value(&context).expect("serialize");
        assert!(value["windows"][0].get("rect").is_none());
        assert!(value["windows"][0].get("components").is_none());
    }

    #[test]
    fn vault_items_expose_name_and_kind_only() {
        let mut state = DesktopState::default();
        apply(
            &mut state,
            json!({
                "action": "CREATE",
                "elementType": "window",
                "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
            }),
        );
        let context = AssistantContext::build(&state);
        assert_eq!(context.secure_items.len(), 1);
        assert_eq!(context.secure_items[0].name, "Journal");

        let value = serde_json::to_value(&context).expect("serialize");
        let item = &value["secureItems"][0];
        assert_eq!(item["type"], "note");
        assert!(item.get("password").is_none());
        assert!(item.get("encryptedContent").is_none());
    }

    #[test]
    fn hidden_windows_stay_visible_to_the_assistant() {
        let mut state = DesktopState::default();
        apply(
            &mut state,
            json!({
                "action": "CREATE",
                "elementType": "window",
                "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
            }),
        );
        let id = state.windows.iter().next().expect("window").id.clone();
        apply(
            &mut state,
            json!({ "action": "DELETE", "elementType": "window", "targetId": id }),
        );
        let context = AssistantContext::build(&state);
        assert_eq!(context.windows.len(), 1);
        assert!(context.windows[0].is_hidden);
        assert_eq!(context.windows[0].note_name.as_deref(), Some("Journal"));
    }

    #[test]
    fn gamification_counters_ride_along() {
        let mut state = DesktopState::default();
        state.progression.state.level = 3;
        let context = AssistantContext::build(&state);
        assert_eq!(context.gamification.level, 3);
        assert!(context.to_json().contains("\"level\":3"));
    }

    #[test]
    fn quest_and_achievement_titles_track_their_latches() {
        use gamification::{Quest, QuestCadence, QuestMetric};

        let mut state = DesktopState::default();
        state.progression.quests.push(Quest {
            id: "daily-words".to_string(),
            title: "Daily Scribe".to_string(),
            description: "Write 200 words".to_string(),
            cadence: QuestCadence::Daily,
            metric: QuestMetric::WriteWords,
            progress: 0,
            goal: 200,
            xp_reward: 100.0,
            reward_loot_chests: 0,
            completed: false,
        });
        state.progression.achievements[0].unlocked = true;

        let context = AssistantContext::build(&state);
        assert_eq!(context.active_quests, vec!["Daily Scribe".to_string()]);
        assert_eq!(context.unlocked_achievements, vec!["Code Master".to_string()]);

        state.progression.quests[0].completed = true;
        let context = AssistantContext::build(&state);
        assert_eq!(context.active_quests, Vec::<String>::new());
    }
}
