//! Persisted history records
//!
//! One record per line, four tab-separated fields:
//!
//! ```text
//! project<TAB><TAB>Assets/Textures/grass.png<TAB>0
//! scene<TAB>Assets/Scenes/Main.unity<TAB>World/Player<TAB>1
//! ```
//!
//! Backslash, tab, CR and LF inside a field are escaped as `\\`, `\t`,
//! `\r` and `\n`. Blank lines are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::{ContextKey, ContextKind, HistoryItem, SelectableTarget};
use crate::error::NavigatorError;

/// A single persisted history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub context_kind: ContextKind,
    pub context_id: String,
    /// Asset id for project items, hierarchy path otherwise
    pub object: String,
    pub is_pinned: bool,
}

impl HistoryRecord {
    /// Build a record from a history item (None for invalid targets)
    pub fn from_item(item: &HistoryItem) -> Option<Self> {
        let key = item.target.context_key()?;
        let object = item.target.object_id()?.to_string();
        Some(Self {
            context_kind: key.kind,
            context_id: key.id,
            object,
            is_pinned: item.is_pinned,
        })
    }

    pub fn target(&self) -> SelectableTarget {
        SelectableTarget::from_parts(self.context_kind, &self.context_id, &self.object)
    }

    pub fn context_key(&self) -> ContextKey {
        ContextKey::new(self.context_kind, self.context_id.clone())
    }

    /// Encode as a single line (without the trailing newline)
    pub fn encode(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.context_kind,
            escape(&self.context_id),
            escape(&self.object),
            if self.is_pinned { "1" } else { "0" }
        )
    }

    /// Decode one line. `line_no` is 1-based and only used for errors.
    pub fn decode(line: &str, line_no: usize) -> Result<Self, NavigatorError> {
        let malformed = |reason: &str| NavigatorError::MalformedRecord {
            line: line_no,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return Err(malformed(&format!("expected 4 fields, found {}", fields.len())));
        }

        let context_kind = ContextKind::from_str(fields[0])
            .ok_or_else(|| malformed(&format!("unknown context kind '{}'", fields[0])))?;
        let context_id = unescape(fields[1]).ok_or_else(|| malformed("bad escape in context id"))?;
        let object = unescape(fields[2]).ok_or_else(|| malformed("bad escape in object"))?;
        let is_pinned = match fields[3] {
            "0" => false,
            "1" => true,
            other => return Err(malformed(&format!("bad pinned flag '{}'", other))),
        };

        if object.is_empty() {
            return Err(malformed("empty object id"));
        }
        match context_kind {
            ContextKind::Project if !context_id.is_empty() => {
                return Err(malformed("project records take no context id"));
            }
            ContextKind::Scene | ContextKind::Prefab if context_id.is_empty() => {
                return Err(malformed("missing context id"));
            }
            _ => {}
        }

        Ok(Self {
            context_kind,
            context_id,
            object,
            is_pinned,
        })
    }
}

/// Encode records one per line, in order
pub fn encode_records(records: &[HistoryRecord]) -> String {
    records
        .iter()
        .map(HistoryRecord::encode)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode every well-formed line, collecting errors for the rest
pub fn decode_records(data: &str) -> (Vec<HistoryRecord>, Vec<NavigatorError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match HistoryRecord::decode(line, index + 1) {
            Ok(record) => records.push(record),
            Err(err) => errors.push(err),
        }
    }

    (records, errors)
}

fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(field: &str) -> Option<String> {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}
