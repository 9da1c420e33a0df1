//! Filesystem-backed host for the command line
//!
//! Files under the project directory are assets. A scene or prefab context
//! is a file in the project whose lines list the hierarchy paths of its
//! members:
//!
//! ```text
//! World
//! World/Player
//! World/Player/Camera
//! ```

use std::path::PathBuf;

use selnav::host::{ContextResolver, ResolvedObject, SelectionHost, TargetResolver};
use selnav::{ContextKey, SelectableTarget};

#[derive(Debug, Clone)]
pub struct ProjectDir {
    root: PathBuf,
}

impl ProjectDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(id.trim_start_matches('/'))
    }

    fn has_member(&self, context_id: &str, path: &str) -> bool {
        std::fs::read_to_string(self.path_of(context_id))
            .map(|content| content.lines().any(|line| line.trim() == path))
            .unwrap_or(false)
    }
}

impl ContextResolver for ProjectDir {
    fn resolve_context(&self, key: &ContextKey) -> Option<String> {
        let path = self.path_of(&key.id);
        if !path.is_file() {
            return None;
        }
        let name = path.file_stem()?.to_string_lossy().into_owned();
        Some(name)
    }
}

impl TargetResolver for ProjectDir {
    fn resolve_target(&self, target: &SelectableTarget) -> Option<ResolvedObject> {
        match target {
            SelectableTarget::ProjectAsset { asset_id } => {
                let path = self.path_of(asset_id);
                let metadata = std::fs::metadata(&path).ok()?;
                let name = target.short_name().to_string();
                if metadata.is_dir() {
                    Some(ResolvedObject::folder(name))
                } else {
                    Some(ResolvedObject::named(name))
                }
            }
            SelectableTarget::SceneMember {
                context_id,
                path_from_root,
            }
            | SelectableTarget::PrefabMember {
                context_id,
                path_from_root,
            } => self
                .has_member(context_id, path_from_root)
                .then(|| ResolvedObject::named(target.short_name())),
            SelectableTarget::Invalid => None,
        }
    }
}

/// Selection state for one CLI invocation
#[derive(Debug, Default)]
pub struct CliHost {
    selected: SelectableTarget,
}

impl CliHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user selecting `target` in the editor
    pub fn user_select(&mut self, target: SelectableTarget) {
        self.selected = target;
    }
}

impl SelectionHost for CliHost {
    fn current_active_target(&self) -> SelectableTarget {
        self.selected.clone()
    }

    fn set_active_selection(&mut self, target: &SelectableTarget) {
        self.selected = target.clone();
    }

    fn activate(&mut self, target: &SelectableTarget) {
        println!("Open {}", target);
    }
}
