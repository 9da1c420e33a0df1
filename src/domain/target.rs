//! Selectable target definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::context::{ContextKey, ContextKind};
use crate::error::NavigatorError;

/// The thing the user selected, identified abstractly rather than by live
/// reference.
///
/// Project assets are stable across restarts. Scene and prefab members are
/// addressed by their hierarchy path and only resolve while their owning
/// context is open, so they are looked up again on every use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectableTarget {
    /// Persistent asset identified by a stable id or path
    ProjectAsset { asset_id: String },
    /// Object inside a scene, by path from the scene root
    SceneMember {
        context_id: String,
        path_from_root: String,
    },
    /// Object inside a prefab being edited, by path from the prefab root
    PrefabMember {
        context_id: String,
        path_from_root: String,
    },
    /// Selection cleared or failed to resolve
    #[default]
    Invalid,
}

impl SelectableTarget {
    pub fn asset(asset_id: impl Into<String>) -> Self {
        SelectableTarget::ProjectAsset {
            asset_id: asset_id.into(),
        }
    }

    pub fn scene_member(context_id: impl Into<String>, path: impl Into<String>) -> Self {
        SelectableTarget::SceneMember {
            context_id: context_id.into(),
            path_from_root: path.into(),
        }
    }

    pub fn prefab_member(context_id: impl Into<String>, path: impl Into<String>) -> Self {
        SelectableTarget::PrefabMember {
            context_id: context_id.into(),
            path_from_root: path.into(),
        }
    }

    /// Build a target from its persisted parts
    pub fn from_parts(kind: ContextKind, context_id: &str, object: &str) -> Self {
        match kind {
            ContextKind::Project => Self::asset(object),
            ContextKind::Scene => Self::scene_member(context_id, object),
            ContextKind::Prefab => Self::prefab_member(context_id, object),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, SelectableTarget::Invalid)
    }

    /// The context that owns this target (None for `Invalid`)
    pub fn context_key(&self) -> Option<ContextKey> {
        match self {
            SelectableTarget::ProjectAsset { .. } => Some(ContextKey::project()),
            SelectableTarget::SceneMember { context_id, .. } => {
                Some(ContextKey::scene(context_id.clone()))
            }
            SelectableTarget::PrefabMember { context_id, .. } => {
                Some(ContextKey::prefab(context_id.clone()))
            }
            SelectableTarget::Invalid => None,
        }
    }

    /// Asset id or hierarchy path, whichever identifies the object
    pub fn object_id(&self) -> Option<&str> {
        match self {
            SelectableTarget::ProjectAsset { asset_id } => Some(asset_id),
            SelectableTarget::SceneMember { path_from_root, .. }
            | SelectableTarget::PrefabMember { path_from_root, .. } => Some(path_from_root),
            SelectableTarget::Invalid => None,
        }
    }

    /// Last segment of the object id, used as a fallback label
    pub fn short_name(&self) -> &str {
        let id = self.object_id().unwrap_or("");
        id.rsplit('/').find(|s| !s.is_empty()).unwrap_or(id)
    }
}

impl AsRef<SelectableTarget> for SelectableTarget {
    fn as_ref(&self) -> &SelectableTarget {
        self
    }
}

impl fmt::Display for SelectableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectableTarget::ProjectAsset { asset_id } => write!(f, "asset:{}", asset_id),
            SelectableTarget::SceneMember {
                context_id,
                path_from_root,
            } => write!(f, "scene:{}:{}", context_id, path_from_root),
            SelectableTarget::PrefabMember {
                context_id,
                path_from_root,
            } => write!(f, "prefab:{}:{}", context_id, path_from_root),
            SelectableTarget::Invalid => write!(f, "invalid"),
        }
    }
}

impl FromStr for SelectableTarget {
    type Err = NavigatorError;

    /// Parse `asset:<id>`, `scene:<ctx>:<path>` or `prefab:<ctx>:<path>`.
    ///
    /// The context id ends at the first `:` after the prefix, so the
    /// hierarchy path may contain `:` but the context id may not. A context
    /// id such as `C:/x.unity` does not survive a `Display` round trip; use
    /// a project-relative id instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NavigatorError::InvalidTarget(s.to_string());

        let (prefix, rest) = s.split_once(':').ok_or_else(invalid)?;
        let kind = match prefix.to_lowercase().as_str() {
            "a" | "asset" => ContextKind::Project,
            "s" | "scene" => ContextKind::Scene,
            "p" | "prefab" => ContextKind::Prefab,
            _ => return Err(invalid()),
        };

        if kind == ContextKind::Project {
            if rest.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::asset(rest));
        }

        let (context_id, path) = rest.split_once(':').ok_or_else(invalid)?;
        if context_id.is_empty() || path.is_empty() {
            return Err(invalid());
        }
        Ok(Self::from_parts(kind, context_id, path))
    }
}
