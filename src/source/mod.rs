//! Loader abstraction layer.
//!
//! This module defines the two capabilities the headlines controller is
//! composed from — [`NewsLoader`] for the article list and [`ImageLoader`]
//! for per-row image bytes — plus the common [`Article`] type.  Concrete
//! loaders live in sub-modules.
//!
//! ## For contributors — adding a new feed
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomNewsLoader`) and implement [`NewsLoader`]
//!    for it, spawning the request on an [`HttpClient`].
//! 3. Add `mod atom;` below and re-export your struct in the `pub use` block.
//! 4. Select it in `main.rs` from the parsed [`Config`](crate::config::Config).
//!
//! The controller, the viewport tracking and the UI are all loader-agnostic.

mod article;
mod http;
mod news_api;
mod rss;

// Re-export the public API of this module so callers can write
// `use crate::source::{Article, NewsLoader, RssNewsLoader};`
pub use article::{newest_first, Article};
pub use http::{HttpClient, HttpImageLoader, HttpImageTask};
pub use news_api::{NewsApiError, NewsApiLoader};
pub use rss::RssNewsLoader;

use anyhow::Result;
use reqwest::Url;

/// Receives the outcome of one [`NewsLoader::load`] call.
pub type NewsLoaderCompletion = Box<dyn FnOnce(Result<Vec<Article>>) + Send + 'static>;

/// Receives the outcome of one [`ImageLoader::load_image`] call.
pub type ImageLoaderCompletion = Box<dyn FnOnce(Result<Vec<u8>>) + Send + 'static>;

/// Loads the ordered article list.
///
/// The completion is invoked exactly once per call, on whatever thread the
/// implementation likes.  Callers never cancel a feed load.
///
/// ## Implementing a new loader
///
/// ```ignore
/// pub struct MyLoader { http: HttpClient }
///
/// impl NewsLoader for MyLoader {
///     fn load(&self, completion: NewsLoaderCompletion) {
///         self.http.spawn(fetch_my_articles(self.http.client().clone()), completion);
///     }
/// }
/// ```
pub trait NewsLoader: Send + Sync {
    fn load(&self, completion: NewsLoaderCompletion);
}

/// Handle to an in-flight image fetch.
pub trait ImageLoaderTask: Send {
    /// Suppress the completion of this fetch.
    ///
    /// Once `cancel` returns the completion will not start.  A completion
    /// that is already running finishes first, so a completion must never
    /// cancel its own task.
    ///
    /// Safe to call any number of times, and after the fetch has completed
    /// (a no-op then).  The underlying work is not guaranteed to stop
    /// promptly.
    fn cancel(&self);
}

/// Loads raw image bytes for a URL.
///
/// The completion is invoked exactly once unless the returned task is
/// cancelled first.
pub trait ImageLoader: Send + Sync {
    fn load_image(&self, url: &Url, completion: ImageLoaderCompletion) -> Box<dyn ImageLoaderTask>;
}
