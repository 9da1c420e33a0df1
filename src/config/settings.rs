//! Settings configuration types

use serde::{Deserialize, Serialize};

/// Selection history settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of unpinned items kept in history.
    /// Pinned items sit outside this window.
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// Record folder assets
    #[serde(default = "default_record_folders")]
    pub record_folders: bool,

    /// Record objects inside scenes
    #[serde(default = "default_record_scene_members")]
    pub record_scene_members: bool,

    /// Record objects inside a prefab being edited
    #[serde(default = "default_record_prefab_members")]
    pub record_prefab_members: bool,

    /// Keep listing recent scenes and prefabs while they are closed
    #[serde(default = "default_show_inactive_contexts")]
    pub show_inactive_contexts: bool,

    /// Print detailed debug messages
    #[serde(default)]
    pub verbose_logs: bool,

    /// Two clicks on the same item within this window count as a repeat
    /// action (opens the target)
    #[serde(default = "default_double_click_interval_ms")]
    pub double_click_interval_ms: u64,
}

fn default_max_history_size() -> usize {
    32
}

fn default_record_folders() -> bool {
    true
}

fn default_record_scene_members() -> bool {
    true
}

fn default_record_prefab_members() -> bool {
    false
}

fn default_show_inactive_contexts() -> bool {
    true
}

fn default_double_click_interval_ms() -> u64 {
    500
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            record_folders: default_record_folders(),
            record_scene_members: default_record_scene_members(),
            record_prefab_members: default_record_prefab_members(),
            show_inactive_contexts: default_show_inactive_contexts(),
            verbose_logs: false,
            double_click_interval_ms: default_double_click_interval_ms(),
        }
    }
}

impl HistorySettings {
    /// Settings with a given history size and defaults elsewhere
    pub fn with_max_size(max_history_size: usize) -> Self {
        Self {
            max_history_size,
            ..Self::default()
        }
        .normalized()
    }

    /// Clamp values that would make the history unusable
    pub fn normalized(mut self) -> Self {
        self.max_history_size = self.max_history_size.max(1);
        self
    }

    /// Double-click window as a chrono duration
    pub fn double_click_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.double_click_interval_ms.min(i64::MAX as u64) as i64)
    }
}
