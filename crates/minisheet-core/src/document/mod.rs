//! Document state and logic (UI-agnostic).

mod eval;
mod filter;
mod history;
mod io;
mod ops;
mod state;

pub use filter::RowFilter;
pub use history::{Action, History, HistoryEntry};
pub use state::Document;
