//! Selection context definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of scope a selection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// The project itself (singleton, always active)
    Project,
    /// A scene, active while it is open
    Scene,
    /// A prefab edit session, active while it is being edited
    Prefab,
}

impl ContextKind {
    /// Parse a context kind from a string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "project" => Some(ContextKind::Project),
            "scene" => Some(ContextKind::Scene),
            "prefab" => Some(ContextKind::Prefab),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Project => "project",
            ContextKind::Scene => "scene",
            ContextKind::Prefab => "prefab",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a context: its kind plus the host's stable id.
/// The project context always has an empty id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub kind: ContextKind,
    pub id: String,
}

impl ContextKey {
    pub fn new(kind: ContextKind, id: impl Into<String>) -> Self {
        match kind {
            ContextKind::Project => Self::project(),
            _ => Self {
                kind,
                id: id.into(),
            },
        }
    }

    pub fn project() -> Self {
        Self {
            kind: ContextKind::Project,
            id: String::new(),
        }
    }

    pub fn scene(id: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Scene,
            id: id.into(),
        }
    }

    pub fn prefab(id: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Prefab,
            id: id.into(),
        }
    }

    pub fn is_project(&self) -> bool {
        self.kind == ContextKind::Project
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_project() {
            write!(f, "project")
        } else {
            write!(f, "{}:{}", self.kind, self.id)
        }
    }
}

/// A registered context record. Owned by the context registry; history items
/// only refer to it by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub key: ContextKey,

    /// Human-readable name reported by the host when the context was resolved
    pub name: String,
}

impl SelectionContext {
    pub fn new(key: ContextKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }

    pub fn project() -> Self {
        Self::new(ContextKey::project(), "Project")
    }

    pub fn kind(&self) -> ContextKind {
        self.key.kind
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }
}
