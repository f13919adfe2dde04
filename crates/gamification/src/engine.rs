//! Progression engine: event reactions over the progression model.

use serde::{Deserialize, Serialize};

use crate::model::{
    default_achievements, Achievement, GamificationState, Quest, QuestMetric, XP_PER_LINE_OF_CODE,
    XP_PER_LOOT_CHEST, XP_PER_SESSION_MINUTE, XP_PER_WORD,
};

/// Something noteworthy the engine did while reacting to activity.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    /// The player reached a new level.
    LeveledUp {
        /// Level just reached.
        level: u32,
    },
    /// A quest crossed its goal.
    QuestCompleted {
        /// Quest title.
        title: String,
        /// XP granted for the completion.
        xp_reward: f64,
    },
    /// An achievement unlocked.
    AchievementUnlocked {
        /// Achievement title.
        title: String,
    },
    /// A loot chest was opened.
    LootChestOpened {
        /// Reward description.
        reward: String,
    },
}

impl ProgressionEvent {
    /// Notification line for this event.
    pub fn message(&self) -> String {
        match self {
            Self::LeveledUp { level } => {
                format!("Congratulations! You've reached Level {level}!")
            }
            Self::QuestCompleted { title, xp_reward } => {
                format!("Quest Complete: {title}! You earned {xp_reward} XP.")
            }
            Self::AchievementUnlocked { title } => format!("Achievement Unlocked: {title}!"),
            Self::LootChestOpened { reward } => {
                format!("You opened a loot chest and found {reward}")
            }
        }
    }
}

/// XP threshold for the level after `level`.
fn xp_threshold(level: u32) -> f64 {
    (1000.0 * 1.2f64.powi(level as i32)).floor()
}

/// The whole progression aggregate: state, quest list, achievement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Level/XP/counter state.
    pub state: GamificationState,
    /// Active quests.
    pub quests: Vec<Quest>,
    /// Achievement catalog with unlock latches.
    pub achievements: Vec<Achievement>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            state: GamificationState::default(),
            quests: Vec::new(),
            achievements: default_achievements(),
        }
    }
}

impl Progression {
    /// Adds XP, leveling up at most once per call.
    ///
    /// A level-up carries the XP remainder forward, raises the next
    /// threshold to `floor(1000 * 1.2^level)`, and grants one loot chest.
    /// An award larger than the threshold leaves the surplus for the next
    /// award to trigger on.
    pub fn add_xp(&mut self, amount: f64) -> Option<ProgressionEvent> {
        let new_xp = self.state.xp + amount;
        if new_xp >= self.state.xp_to_next_level {
            self.state.xp = new_xp - self.state.xp_to_next_level;
            self.state.level += 1;
            self.state.xp_to_next_level = xp_threshold(self.state.level);
            self.state.unopened_loot_chests += 1;
            return Some(ProgressionEvent::LeveledUp {
                level: self.state.level,
            });
        }
        self.state.xp = new_xp;
        None
    }

    /// Advances every incomplete quest tracking `metric` by `value`.
    ///
    /// Progress clamps at the goal. Crossing the goal latches the quest,
    /// grants its XP and chest rewards exactly once, bumps the completed
    /// count, and re-checks achievements.
    pub fn advance_quest(&mut self, metric: QuestMetric, value: u64) -> Vec<ProgressionEvent> {
        let mut completions = Vec::new();
        for quest in &mut self.quests {
            if quest.metric != metric || quest.completed {
                continue;
            }
            quest.progress = quest.goal.min(quest.progress + value);
            if quest.progress >= quest.goal {
                quest.completed = true;
                completions.push((
                    quest.title.clone(),
                    quest.xp_reward,
                    quest.reward_loot_chests,
                ));
            }
        }

        let mut events = Vec::new();
        let any_completed = !completions.is_empty();
        for (title, xp_reward, chests) in completions {
            events.push(ProgressionEvent::QuestCompleted { title, xp_reward });
            events.extend(self.add_xp(xp_reward));
            self.state.unopened_loot_chests += chests;
            self.state.quests_completed += 1;
        }
        if any_completed {
            events.extend(self.reevaluate_achievements());
        }
        events
    }

    /// Unlocks every achievement whose threshold the counters now meet.
    pub fn reevaluate_achievements(&mut self) -> Vec<ProgressionEvent> {
        let state = &self.state;
        let mut events = Vec::new();
        for achievement in &mut self.achievements {
            if achievement.unlocked {
                continue;
            }
            let met = match achievement.id.as_str() {
                "code-master-1" => state.lines_of_code_written >= 1000,
                "focus-samurai-1" => state.focus_sessions_completed >= 50,
                "task-master-1" => state.quests_completed >= 100,
                _ => false,
            };
            if met {
                achievement.unlocked = true;
                events.push(ProgressionEvent::AchievementUnlocked {
                    title: achievement.title.clone(),
                });
            }
        }
        events
    }

    /// Reacts to words added in an unlocked note.
    pub fn words_written(&mut self, words: u64) -> Vec<ProgressionEvent> {
        let mut events = Vec::new();
        events.extend(self.add_xp(XP_PER_WORD * words as f64));
        events.extend(self.advance_quest(QuestMetric::WriteWords, words));
        events
    }

    /// Reacts to lines added in the code editor.
    pub fn lines_coded(&mut self, lines: u64) -> Vec<ProgressionEvent> {
        let mut events = Vec::new();
        events.extend(self.add_xp(XP_PER_LINE_OF_CODE * lines as f64));
        self.state.lines_of_code_written += lines;
        events.extend(self.advance_quest(QuestMetric::LinesCoded, lines));
        events.extend(self.reevaluate_achievements());
        events
    }

    /// Reacts to a completed focus session of the configured duration.
    ///
    /// XP scales with whole minutes, so sub-minute sessions complete without
    /// an XP award.
    pub fn focus_session_completed(&mut self, duration_seconds: u64) -> Vec<ProgressionEvent> {
        let minutes = duration_seconds / 60;
        let mut events = Vec::new();
        events.extend(self.add_xp(XP_PER_SESSION_MINUTE * minutes as f64));
        self.state.focus_sessions_completed += 1;
        events.extend(self.advance_quest(QuestMetric::FocusSessions, 1));
        events.extend(self.reevaluate_achievements());
        events
    }

    /// Records a newly created secure note.
    pub fn note_created(&mut self) {
        self.state.notes_created += 1;
    }

    /// Opens one loot chest if any are available.
    pub fn open_loot_chest(&mut self) -> Vec<ProgressionEvent> {
        if self.state.unopened_loot_chests == 0 {
            return Vec::new();
        }
        self.state.unopened_loot_chests -= 1;
        let mut events = vec![ProgressionEvent::LootChestOpened {
            reward: "a new AI wallpaper!".to_string(),
        }];
        events.extend(self.add_xp(XP_PER_LOOT_CHEST));
        events
    }
}
