use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, trace, warn};

use super::cell::{HeadlineCell, RowImage};
use crate::source::{Article, ImageLoader, ImageLoaderTask, NewsLoader};

/// Loader results marshaled back to the controller's thread.
pub enum HeadlinesEvent {
    FeedLoaded(Result<Vec<Article>>),
    ImageLoaded {
        row: usize,
        task_id: u64,
        result: Result<Vec<u8>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Display,
    Prefetch,
}

struct RowTask {
    id: u64,
    purpose: Purpose,
    handle: Box<dyn ImageLoaderTask>,
}

/// Owns the article snapshot and binds each visible row to its own
/// cancellable image fetch.
///
/// All methods must be called from the thread that owns the controller.
/// Loader completions are applied by [`process_events`](Self::process_events).
pub struct HeadlinesController {
    feed_loader: Arc<dyn NewsLoader>,
    image_loader: Arc<dyn ImageLoader>,
    articles: Vec<Article>,
    cells: HashMap<usize, HeadlineCell>,
    tasks: HashMap<usize, RowTask>,
    next_task_id: u64,
    is_loading: bool,
    snapshot_version: u64,
    events_tx: Sender<HeadlinesEvent>,
    events_rx: Receiver<HeadlinesEvent>,
}

impl HeadlinesController {
    /// Does not call either loader.
    pub fn new(feed_loader: Arc<dyn NewsLoader>, image_loader: Arc<dyn ImageLoader>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            feed_loader,
            image_loader,
            articles: Vec::new(),
            cells: HashMap::new(),
            tasks: HashMap::new(),
            next_task_id: 0,
            is_loading: false,
            snapshot_version: 0,
            events_tx,
            events_rx,
        }
    }

    // -- feed ----------------------------------------------------------------

    /// Ask the feed loader for a fresh snapshot.
    ///
    /// Every call issues exactly one loader request; earlier requests are
    /// neither awaited nor deduplicated.
    pub fn load(&mut self) {
        self.is_loading = true;
        debug!("loading headlines");

        let tx = self.events_tx.clone();
        self.feed_loader.load(Box::new(move |result| {
            // The receiver only goes away with the controller.
            let _ = tx.send(HeadlinesEvent::FeedLoaded(result));
        }));
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Bumped on every successful load.  Hosts re-bind their visible rows
    /// when it changes.
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot_version
    }

    pub fn number_of_rows(&self) -> usize {
        self.articles.len()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn article(&self, row: usize) -> Option<&Article> {
        self.articles.get(row)
    }

    // -- rows ----------------------------------------------------------------

    /// Bind `row` for display and start fetching its image.
    ///
    /// Returns `None` for a row outside the snapshot.
    pub fn cell_for_row(&mut self, row: usize) -> Option<&HeadlineCell> {
        let article = self.articles.get(row)?;
        self.cells.insert(row, HeadlineCell::new(article));
        self.start_image_task(row, Purpose::Display);
        self.cells.get(&row)
    }

    pub fn cell(&self, row: usize) -> Option<&HeadlineCell> {
        self.cells.get(&row)
    }

    /// Re-run the fetch for a bound row.  Returns `false` if `row` is not
    /// bound.
    pub fn retry_image(&mut self, row: usize) -> bool {
        let Some(cell) = self.cells.get_mut(&row) else {
            return false;
        };
        cell.image = RowImage::Loading;
        debug!(row, "retrying image");
        self.start_image_task(row, Purpose::Display);
        true
    }

    /// The row scrolled out of view.
    pub fn did_end_displaying(&mut self, row: usize) {
        self.cancel_task(row);
        self.cells.remove(&row);
    }

    /// Warm up rows that are about to become visible.
    pub fn prefetch_rows(&mut self, rows: &[usize]) {
        for &row in rows {
            if row < self.articles.len() && !self.tasks.contains_key(&row) {
                self.start_image_task(row, Purpose::Prefetch);
            }
        }
    }

    pub fn cancel_prefetching(&mut self, rows: &[usize]) {
        for &row in rows {
            self.cancel_task(row);
        }
    }

    pub fn has_pending_image_task(&self, row: usize) -> bool {
        self.tasks.contains_key(&row)
    }

    // -- events --------------------------------------------------------------

    /// Apply every loader result queued so far.  Returns how many were
    /// drained.
    pub fn process_events(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            drained += 1;
            match event {
                HeadlinesEvent::FeedLoaded(result) => self.finish_load(result),
                HeadlinesEvent::ImageLoaded { row, task_id, result } => {
                    self.finish_image_task(row, task_id, result)
                }
            }
        }
        drained
    }

    fn finish_load(&mut self, result: Result<Vec<Article>>) {
        match result {
            Ok(articles) => {
                debug!(count = articles.len(), "headlines loaded");
                self.articles = articles;
                self.reload_data();
            }
            Err(e) => warn!("failed to load headlines: {e:#}"),
        }
        self.is_loading = false;
    }

    /// Every bound row ends display against the new snapshot.
    fn reload_data(&mut self) {
        for (row, task) in self.tasks.drain() {
            trace!(row, task_id = task.id, "cancelling image task on reload");
            task.handle.cancel();
        }
        self.cells.clear();
        self.snapshot_version += 1;
    }

    fn start_image_task(&mut self, row: usize, purpose: Purpose) {
        let Some(image_url) = self.articles.get(row).map(|a| a.image_url.clone()) else {
            return;
        };

        // A superseded fetch must never land on the row.
        self.cancel_task(row);

        let task_id = self.next_task_id;
        self.next_task_id += 1;
        trace!(row, task_id, ?purpose, url = %image_url, "loading image");

        let tx = self.events_tx.clone();
        let handle = self.image_loader.load_image(
            &image_url,
            Box::new(move |result| {
                let _ = tx.send(HeadlinesEvent::ImageLoaded { row, task_id, result });
            }),
        );

        self.tasks.insert(
            row,
            RowTask {
                id: task_id,
                purpose,
                handle,
            },
        );
    }

    fn cancel_task(&mut self, row: usize) {
        if let Some(task) = self.tasks.remove(&row) {
            trace!(row, task_id = task.id, "cancelling image task");
            task.handle.cancel();
        }
    }

    fn finish_image_task(&mut self, row: usize, task_id: u64, result: Result<Vec<u8>>) {
        match self.tasks.get(&row) {
            Some(task) if task.id == task_id => {}
            _ => {
                trace!(row, task_id, "discarding stale image result");
                return;
            }
        }
        let Some(task) = self.tasks.remove(&row) else {
            return;
        };
        if task.purpose == Purpose::Prefetch {
            return;
        }

        let Some(cell) = self.cells.get_mut(&row) else {
            return;
        };
        cell.image = match result {
            Ok(bytes) => RowImage::Loaded(bytes),
            Err(e) => {
                debug!(row, "image load failed: {e:#}");
                RowImage::Failed
            }
        };
    }
}

impl Drop for HeadlinesController {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
