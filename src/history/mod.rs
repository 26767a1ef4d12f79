// src/history/mod.rs — Action ingest, bounded history, frequency/transition index

pub mod event;
pub mod index;
pub mod ingest;
pub mod store;

pub use event::{ActionDetails, ActionEvent, ActionKey, ActionKind, ViewContext};
pub use index::{Successor, TransitionIndex};
pub use ingest::ChangeNotification;
pub use store::{HistoryStatistics, HistoryStore};
