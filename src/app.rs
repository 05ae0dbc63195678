//! Application state for the terminal front end.
//!
//! [`App`] hosts a [`HeadlinesController`] the way a list toolkit would: it
//! owns the selection, turns the rendered viewport into appear / disappear /
//! prefetch calls, and drains loader results once per tick.

use std::ops::Range;

use ratatui::widgets::ListState;
use tracing::trace;

use crate::headlines::HeadlinesController;
use crate::viewport::VisibilityTracker;

pub struct App {
    pub headlines: HeadlinesController,
    /// List selection state for scrolling.
    pub list_state: ListState,
    tracker: VisibilityTracker,
    seen_version: u64,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(headlines: HeadlinesController, prefetch_depth: usize) -> Self {
        let seen_version = headlines.snapshot_version();
        Self {
            headlines,
            list_state: ListState::default(),
            tracker: VisibilityTracker::new(prefetch_depth),
            seen_version,
            quit: false,
        }
    }

    fn row_count(&self) -> usize {
        self.headlines.number_of_rows()
    }

    /// Apply pending loader results.
    pub fn tick(&mut self) {
        self.headlines.process_events();

        let version = self.headlines.snapshot_version();
        if version != self.seen_version {
            // The controller already ended display of every row.
            self.seen_version = version;
            self.tracker.reset();
            self.clamp_selection();
        }
    }

    /// Feed the rows the list actually rendered back into the controller.
    pub fn sync_visibility(&mut self, visible: Range<usize>) {
        let diff = self.tracker.update(visible, self.row_count());
        if diff.is_empty() {
            return;
        }
        trace!(?diff, "visibility changed");

        for &row in &diff.disappeared {
            self.headlines.did_end_displaying(row);
        }
        self.headlines.cancel_prefetching(&diff.cancel_prefetch);
        for &row in &diff.appeared {
            self.headlines.cell_for_row(row);
        }
        self.headlines.prefetch_rows(&diff.prefetch);
    }

    pub fn refresh(&mut self) {
        self.headlines.load();
    }

    /// Retry the selected row's image if it failed.
    pub fn retry_selected(&mut self) -> bool {
        let Some(row) = self.list_state.selected() else {
            return false;
        };
        let failed = self
            .headlines
            .cell(row)
            .is_some_and(|cell| cell.is_showing_retry_action());
        failed && self.headlines.retry_image(row)
    }

    pub fn status(&self) -> &'static str {
        if self.headlines.is_loading() {
            "Loading…"
        } else {
            "Up to date"
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.row_count();
        match self.list_state.selected() {
            Some(_) if count == 0 => self.list_state.select(None),
            Some(i) if i >= count => self.list_state.select(Some(count - 1)),
            _ => {}
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.row_count() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.row_count() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.row_count() > 0 {
            self.list_state.select(Some(self.row_count() - 1));
        }
    }
}
