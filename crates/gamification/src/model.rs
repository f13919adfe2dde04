//! Progression data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// XP granted per word added to an unlocked note.
pub const XP_PER_WORD: f64 = 0.2;
/// XP granted per line of code added in the code editor.
pub const XP_PER_LINE_OF_CODE: f64 = 2.0;
/// XP granted per whole minute of a completed focus session.
pub const XP_PER_SESSION_MINUTE: f64 = 250.0;
/// XP granted for opening a loot chest.
pub const XP_PER_LOOT_CHEST: f64 = 50.0;

/// Core progression counters and level state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP accumulated toward the next level.
    pub xp: f64,
    /// XP required to reach the next level.
    pub xp_to_next_level: f64,
    /// Consecutive-day activity streak.
    pub streak: u32,
    /// Date of the most recent tracked activity.
    pub last_activity_date: Option<NaiveDate>,
    /// Loot chests earned but not yet opened.
    pub unopened_loot_chests: u32,
    /// Lifetime count of secure notes created.
    pub notes_created: u64,
    /// Lifetime count of completed focus sessions.
    pub focus_sessions_completed: u64,
    /// Lifetime count of code lines written.
    pub lines_of_code_written: u64,
    /// Lifetime count of completed quests.
    pub quests_completed: u64,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0.0,
            xp_to_next_level: 1000.0,
            streak: 0,
            last_activity_date: None,
            unopened_loot_chests: 0,
            notes_created: 0,
            focus_sessions_completed: 0,
            lines_of_code_written: 0,
            quests_completed: 0,
        }
    }
}

/// Recurrence class of a quest. Advisory only; no reset scheduler runs here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestCadence {
    /// Refreshed daily by an external scheduler.
    Daily,
    /// Refreshed weekly by an external scheduler.
    Weekly,
}

/// Activity metric a quest tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestMetric {
    /// Words added to unlocked notes.
    WriteWords,
    /// Completed focus sessions.
    FocusSessions,
    /// Completed quests.
    QuestsCompleted,
    /// Lines of code written.
    LinesCoded,
}

/// One quest with progress toward a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    /// Stable quest identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Recurrence class.
    #[serde(rename = "type")]
    pub cadence: QuestCadence,
    /// Tracked metric.
    pub metric: QuestMetric,
    /// Progress accumulated so far, clamped at `goal`.
    pub progress: u64,
    /// Progress required for completion.
    pub goal: u64,
    /// XP granted once on completion.
    pub xp_reward: f64,
    /// Loot chests granted once on completion.
    pub reward_loot_chests: u32,
    /// One-way completion latch.
    pub completed: bool,
}

/// One achievement with its unlock latch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable achievement identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Icon token for the renderer.
    pub icon: String,
    /// Accent color for the renderer.
    pub color: String,
    /// One-way unlock latch.
    pub unlocked: bool,
}

/// Built-in achievement catalog, all locked.
pub fn default_achievements() -> Vec<Achievement> {
    let template = |id: &str, title: &str, description: &str, icon: &str, color: &str| {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            unlocked: false,
        }
    };
    vec![
        template(
            "code-master-1",
            "Code Master",
            "Write 1000 lines of code",
            "fas fa-code",
            "#fbbF24",
        ),
        template(
            "focus-samurai-1",
            "Focus Samurai",
            "Complete 50 focus sessions",
            "fas fa-user-ninja",
            "#a78bfa",
        ),
        template(
            "task-master-1",
            "Task Master",
            "Complete 100 quests",
            "fas fa-check-double",
            "#4ade80",
        ),
        template(
            "scribe-1",
            "Scribe",
            "Write 5000 words in notes",
            "fas fa-feather-alt",
            "#60a5fa",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_state_starts_at_level_one() {
        let state = GamificationState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.xp_to_next_level, 1000.0);
        assert_eq!(state.unopened_loot_chests, 0);
    }

    #[test]
    fn quest_serializes_with_wire_field_names() {
        let quest = Quest {
            id: "q1".to_string(),
            title: "Deep Work".to_string(),
            description: "Complete 3 focus sessions".to_string(),
            cadence: QuestCadence::Daily,
            metric: QuestMetric::FocusSessions,
            progress: 0,
            goal: 3,
            xp_reward: 300.0,
            reward_loot_chests: 1,
            completed: false,
        };
        let value = serde_json::to_value(&quest).expect("serialize");
        assert_eq!(value["type"], "daily");
        assert_eq!(value["metric"], "focus_sessions");
        assert_eq!(value["xpReward"], 300.0);
    }

    #[test]
    fn achievement_catalog_ships_locked() {
        let catalog = default_achievements();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.iter().all(|a| !a.unlocked));
    }
}
