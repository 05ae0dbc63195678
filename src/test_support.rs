//! In-memory loader spies shared by the unit tests.
//!
//! `LoaderSpy` records every request and cancellation and keeps pending
//! completions so a test decides when (and with what) each one resolves.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use reqwest::Url;

use crate::source::{
    Article, ImageLoader, ImageLoaderCompletion, ImageLoaderTask, NewsLoader, NewsLoaderCompletion,
};

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

pub fn make_article(title: &str, image_url: &str) -> Article {
    Article::new(title, format!("{title} description"), url(image_url))
}

#[derive(Default)]
struct SpyState {
    feed_requests: Vec<Option<NewsLoaderCompletion>>,
    image_requests: Vec<(Url, Option<ImageLoaderCompletion>)>,
    cancelled_image_urls: Vec<Url>,
}

#[derive(Default)]
pub struct LoaderSpy {
    state: Arc<Mutex<SpyState>>,
}

impl LoaderSpy {
    pub fn load_call_count(&self) -> usize {
        self.state.lock().unwrap().feed_requests.len()
    }

    pub fn complete_feed_loading(&self, articles: Vec<Article>, index: usize) {
        self.complete_feed_loading_result(Ok(articles), index);
    }

    pub fn complete_feed_loading_with_error(&self, index: usize) {
        self.complete_feed_loading_result(Err(anyhow!("feed error")), index);
    }

    pub fn complete_feed_loading_result(&self, result: Result<Vec<Article>>, index: usize) {
        // Never call a completion with the lock held.
        let completion = self.state.lock().unwrap().feed_requests[index]
            .take()
            .expect("feed request already completed");
        completion(result);
    }

    pub fn loaded_image_urls(&self) -> Vec<Url> {
        let state = self.state.lock().unwrap();
        state.image_requests.iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn cancelled_image_urls(&self) -> Vec<Url> {
        self.state.lock().unwrap().cancelled_image_urls.clone()
    }

    pub fn complete_image_loading(&self, bytes: Vec<u8>, index: usize) {
        self.complete_image_loading_result(Ok(bytes), index);
    }

    pub fn complete_image_loading_with_error(&self, index: usize) {
        self.complete_image_loading_result(Err(anyhow!("image error")), index);
    }

    fn complete_image_loading_result(&self, result: Result<Vec<u8>>, index: usize) {
        let completion = self.state.lock().unwrap().image_requests[index]
            .1
            .take()
            .expect("image request already completed");
        completion(result);
    }
}

impl NewsLoader for LoaderSpy {
    fn load(&self, completion: NewsLoaderCompletion) {
        self.state.lock().unwrap().feed_requests.push(Some(completion));
    }
}

struct SpyTask {
    url: Url,
    state: Arc<Mutex<SpyState>>,
}

impl ImageLoaderTask for SpyTask {
    fn cancel(&self) {
        self.state.lock().unwrap().cancelled_image_urls.push(self.url.clone());
    }
}

impl ImageLoader for LoaderSpy {
    fn load_image(&self, url: &Url, completion: ImageLoaderCompletion) -> Box<dyn ImageLoaderTask> {
        self.state
            .lock()
            .unwrap()
            .image_requests
            .push((url.clone(), Some(completion)));
        Box::new(SpyTask {
            url: url.clone(),
            state: Arc::clone(&self.state),
        })
    }
}
