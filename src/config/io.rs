//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

/// Default configuration content for `selnav init`
pub const DEFAULT_CONFIG: &str = r#"# selnav configuration
# ====================
#
# Selection history settings. Pinned items never count against
# max_history_size and are never evicted.
#
#   max_history_size         - Unpinned items kept in history (default: 32)
#   record_folders           - Record folder assets (default: true)
#   record_scene_members     - Record objects inside scenes (default: true)
#   record_prefab_members    - Record objects inside prefab edit sessions (default: false)
#   show_inactive_contexts   - List closed scenes/prefabs (default: true)
#   verbose_logs             - Print detailed debug messages (default: false)
#   double_click_interval_ms - Repeat-click window that opens a target (default: 500)

[history]
max_history_size = 32
record_folders = true
record_scene_members = true
record_prefab_members = false
show_inactive_contexts = true
verbose_logs = false
double_click_interval_ms = 500
"#;

impl Config {
    /// Get the global config directory path (~/.selnav/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".selnav")
    }

    /// Get the global config file path (~/.selnav/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Save configuration to a file with atomic write and file locking.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        write_atomic(path, content.as_bytes())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::init_file(path, false)?;
        }
        Self::from_file(path)
    }

    /// Load global configuration from ~/.selnav/config.toml
    /// If no config exists, auto-creates one with defaults.
    pub fn load() -> Result<Self> {
        Self::load_or_init(&Self::global_config_path())
    }

    /// Write the commented default config to `path`.
    ///
    /// Returns false without touching the file if it already exists and
    /// `force` is not set.
    pub fn init_file(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        write_atomic(path, DEFAULT_CONFIG.as_bytes())?;
        tracing::info!("Created {}", path.display());
        Ok(true)
    }
}

/// Write `content` to `path` atomically (temp file + rename) while holding an
/// exclusive lock on a sibling `.lock` file. Creates the parent directory.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
    }

    // Lock file is separate from the target to avoid issues with rename
    let lock_path = sibling_path(path, "lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    // Blocks until available
    lock_file
        .lock_exclusive()
        .with_context(|| format!("Failed to acquire lock: {}", lock_path.display()))?;

    let temp_path = sibling_path(path, "tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;

    temp_file
        .sync_all()
        .with_context(|| format!("Failed to sync {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename into place: {}", path.display()))?;

    // Lock is released when lock_file is dropped
    Ok(())
}

/// `config.toml` -> `config.toml.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
