//! Selection history: the recency list, its persisted form, and the tracker
//! that ties both to the context registry

mod list;
mod record;
mod tracker;

pub use list::HistoryList;
pub use record::{decode_records, encode_records, HistoryRecord};
pub use tracker::{
    ContextSection, HistoryChanged, LoadReport, ReconcileReport, RecordOutcome,
    SelectionHistoryTracker,
};
