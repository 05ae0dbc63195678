use crate::source::Article;

/// Image area of a bound row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowImage {
    /// Fetch in flight: no image, busy indicator on, retry hidden.
    Loading,
    /// Fetch succeeded with these bytes.
    Loaded(Vec<u8>),
    /// Fetch failed: no image, retry shown.
    Failed,
}

/// Passive view model for one bound row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineCell {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub image: RowImage,
}

impl HeadlineCell {
    pub(crate) fn new(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
            image: RowImage::Loading,
        }
    }

    pub fn is_content_visible(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_showing_image_loading_indicator(&self) -> bool {
        self.image == RowImage::Loading
    }

    pub fn is_showing_retry_action(&self) -> bool {
        self.image == RowImage::Failed
    }

    pub fn rendered_image(&self) -> Option<&[u8]> {
        match &self.image {
            RowImage::Loaded(bytes) => Some(bytes),
            _ => None,
        }
    }
}
