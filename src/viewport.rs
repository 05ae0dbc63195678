//! Turning scroll position into row visibility.
//!
//! The list widget only knows an offset and a height.  The controller wants
//! discrete "row appeared / disappeared / about to appear" notifications, so
//! [`VisibilityTracker`] diffs successive visible ranges into exactly those.

use std::collections::BTreeSet;
use std::ops::Range;

/// Rows fully or partially inside a viewport of `viewport_height` lines when
/// the list is scrolled to row `offset`.
pub fn visible_rows(heights: &[usize], offset: usize, viewport_height: usize) -> Range<usize> {
    let start = offset.min(heights.len());
    let mut used = 0;
    let mut end = start;
    for &height in &heights[start..] {
        if used >= viewport_height {
            break;
        }
        used += height;
        end += 1;
    }
    start..end
}

/// Visibility changes since the previous [`VisibilityTracker::update`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisibilityDiff {
    pub appeared: Vec<usize>,
    pub disappeared: Vec<usize>,
    pub prefetch: Vec<usize>,
    pub cancel_prefetch: Vec<usize>,
}

impl VisibilityDiff {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty()
            && self.disappeared.is_empty()
            && self.prefetch.is_empty()
            && self.cancel_prefetch.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    prefetch_depth: usize,
    visible: BTreeSet<usize>,
    prefetched: BTreeSet<usize>,
}

impl VisibilityTracker {
    /// `prefetch_depth` rows below the viewport are warmed up.
    pub fn new(prefetch_depth: usize) -> Self {
        Self {
            prefetch_depth,
            visible: BTreeSet::new(),
            prefetched: BTreeSet::new(),
        }
    }

    pub fn visible(&self) -> &BTreeSet<usize> {
        &self.visible
    }

    /// Forget everything, e.g. after the host already ended display of all
    /// rows.
    pub fn reset(&mut self) {
        self.visible.clear();
        self.prefetched.clear();
    }

    pub fn update(&mut self, visible: Range<usize>, row_count: usize) -> VisibilityDiff {
        let now_visible: BTreeSet<usize> = visible.clone().filter(|&r| r < row_count).collect();
        let prefetch_end = visible.end.saturating_add(self.prefetch_depth).min(row_count);
        let now_prefetched: BTreeSet<usize> = (visible.end..prefetch_end).collect();

        // Rows scrolling into view leave the prefetch set without a cancel:
        // binding them supersedes the warm-up fetch.
        let diff = VisibilityDiff {
            appeared: now_visible.difference(&self.visible).copied().collect(),
            disappeared: self.visible.difference(&now_visible).copied().collect(),
            prefetch: now_prefetched.difference(&self.prefetched).copied().collect(),
            cancel_prefetch: self
                .prefetched
                .difference(&now_prefetched)
                .filter(|r| !now_visible.contains(r))
                .copied()
                .collect(),
        };

        self.visible = now_visible;
        self.prefetched = now_prefetched;
        diff
    }
}
