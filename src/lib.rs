//! top-headlines — a news-headlines list with per-row image loading.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ completion ┌──────────────┐ cell(row) ┌──────────┐
//! │ source/  │ ─────────► │  headlines   │ ────────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (controller) │           │ (render) │
//! └──────────┘            └──────────────┘           └──────────┘
//!                               ▲                         │ visible rows
//!                               │ appear/disappear        ▼
//!                         ┌──────────┐  diff   ┌──────────────┐
//!                         │  app.rs  │ ◄────── │ viewport.rs  │
//!                         └──────────┘         └──────────────┘
//!                               ▲ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`** — the [`NewsLoader`](source::NewsLoader) and
//!   [`ImageLoader`](source::ImageLoader) traits plus RSS, NewsAPI and HTTP
//!   image implementations.
//! * **`headlines`** — the controller: article snapshot, reload cycle and
//!   the row → image-fetch mapping.
//! * **`viewport`** — turns a scroll offset into appear / disappear /
//!   prefetch notifications.
//! * **`app`** — hosts the controller for the terminal front end.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** / **`logging`** — command line and log setup for the binary.

pub mod app;
pub mod config;
pub mod headlines;
pub mod input;
pub mod logging;
pub mod source;
pub mod ui;
pub mod viewport;

#[cfg(test)]
mod test_support;
