//! The headlines list controller and its row view model.
//!
//! ## Threading
//!
//! ```text
//! ┌──────────────┐ completion ┌──────────────┐ process_events() ┌──────────────┐
//! │   loaders    │ ─────────► │  mpsc queue  │ ───────────────► │  controller  │
//! │ (any thread) │ (event)    │              │  (owning thread) │   (state)    │
//! └──────────────┘            └──────────────┘                  └──────────────┘
//! ```
//!
//! Completions handed to the loaders never touch controller state: they only
//! enqueue a [`HeadlinesEvent`].  The owner drains the queue on its own
//! thread (once per UI tick), which is where the snapshot, the row-task
//! mapping and the cells are mutated.

mod cell;
mod controller;

pub use cell::{HeadlineCell, RowImage};
pub use controller::{HeadlinesController, HeadlinesEvent};
