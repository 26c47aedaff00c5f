use serde::Serialize;

/// Display cap for ordinary listings, discovery and search.
pub const GENERIC_PAGE_CEILING: u32 = 500;
/// Display cap for the upcoming-movies listing.
pub const UPCOMING_PAGE_CEILING: u32 = 20;
/// Display cap for trending listings.
pub const TRENDING_PAGE_CEILING: u32 = 10;

pub const PAGE_LINKS: u32 = 5;
pub const COMPACT_PAGE_LINKS: u32 = 3;

/// Position and bound of one result list.
///
/// `total` is already clamped to the owning view's ceiling; upstream counts above it
/// are never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    pub current: u32,
    pub total: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

impl PageCursor {
    /// `current` is pulled into `[1, total]`; an empty listing keeps page 1.
    pub fn new(current: u32, upstream_total: u32, ceiling: u32) -> Self {
        let total = upstream_total.min(ceiling);
        Self {
            current: current.clamp(1, total.max(1)),
            total,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Page numbers for the visible links: at most `max_links`, centred on the current
    /// page and shifted so the run never leaves `[1, total]`.
    pub fn window(&self, max_links: u32) -> Vec<u32> {
        if self.total == 0 || max_links == 0 {
            return Vec::new();
        }
        if self.total <= max_links {
            return (1..=self.total).collect();
        }
        let half = max_links / 2;
        let last_start = self.total - max_links + 1;
        let start = self.current.saturating_sub(half).clamp(1, last_start);
        (start..start + max_links).collect()
    }
}

/// What a paginated view exposes to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    pub pages: Vec<u32>,
    pub previous: Option<u32>,
    pub next: Option<u32>,
    /// Jump link to page 1 when the window does not reach it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Jump link to the last page when the window does not reach it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    /// Pages are skipped between `first` and the window.
    pub gap_before: bool,
    /// Pages are skipped between the window and `last`.
    pub gap_after: bool,
}

impl Pagination {
    /// `None` when there is nothing to paginate.
    pub fn for_cursor(cursor: &PageCursor, max_links: u32) -> Option<Self> {
        if cursor.total <= 1 {
            return None;
        }
        Some(Self {
            current: cursor.current,
            total: cursor.total,
            pages: cursor.window(max_links),
            previous: cursor.has_previous().then(|| cursor.current - 1),
            next: cursor.has_next().then(|| cursor.current + 1),
            first: None,
            last: None,
            gap_before: false,
            gap_after: false,
        })
    }

    /// Adds first and last page links outside the window, with gap markers when pages
    /// are skipped between them.
    pub fn with_edges(mut self) -> Self {
        let (Some(&start), Some(&end)) = (self.pages.first(), self.pages.last()) else {
            return self;
        };
        if start > 1 {
            self.first = Some(1);
            self.gap_before = start > 2;
        }
        if end < self.total {
            self.last = Some(self.total);
            self.gap_after = end + 1 < self.total;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_clamped_to_ceiling() {
        let cursor = PageCursor::new(3, 1000, GENERIC_PAGE_CEILING);
        assert_eq!(cursor.current, 3);
        assert_eq!(cursor.total, 500);
        assert_eq!(PageCursor::new(1, 44, TRENDING_PAGE_CEILING).total, 10);
        assert_eq!(PageCursor::new(1, 7, UPCOMING_PAGE_CEILING).total, 7);
    }

    #[test]
    fn current_never_leaves_the_clamped_range() {
        let cursor = PageCursor::new(15, 44, TRENDING_PAGE_CEILING);
        assert_eq!((cursor.current, cursor.total), (10, 10));
        let cursor = PageCursor::new(50, 63, UPCOMING_PAGE_CEILING);
        assert_eq!((cursor.current, cursor.total), (20, 20));
        let cursor = PageCursor::new(4, 0, GENERIC_PAGE_CEILING);
        assert_eq!((cursor.current, cursor.total), (1, 0));
        assert_eq!(PageCursor::new(0, 5, GENERIC_PAGE_CEILING).current, 1);
    }

    #[test]
    fn edges_mark_skipped_pages() {
        let middle = Pagination::for_cursor(&PageCursor::new(5, 10, 10), PAGE_LINKS)
            .unwrap()
            .with_edges();
        assert_eq!(middle.pages, vec![3, 4, 5, 6, 7]);
        assert_eq!((middle.first, middle.last), (Some(1), Some(10)));
        assert!(middle.gap_before && middle.gap_after);

        let near_start = Pagination::for_cursor(&PageCursor::new(4, 10, 10), PAGE_LINKS)
            .unwrap()
            .with_edges();
        assert_eq!(near_start.pages, vec![2, 3, 4, 5, 6]);
        assert_eq!(near_start.first, Some(1));
        assert!(!near_start.gap_before);

        let short = Pagination::for_cursor(&PageCursor::new(2, 4, 10), PAGE_LINKS)
            .unwrap()
            .with_edges();
        assert_eq!((short.first, short.last), (None, None));
    }

    #[test]
    fn contains_rejects_out_of_range() {
        let cursor = PageCursor::new(1, 4, GENERIC_PAGE_CEILING);
        assert!(!cursor.contains(0));
        assert!(cursor.contains(4));
        assert!(!cursor.contains(5));
    }

    #[test]
    fn window_near_start() {
        let cursor = PageCursor::new(2, 50, GENERIC_PAGE_CEILING);
        assert_eq!(cursor.window(PAGE_LINKS), vec![1, 2, 3, 4, 5]);
        assert_eq!(cursor.window(COMPACT_PAGE_LINKS), vec![1, 2, 3]);
    }

    #[test]
    fn window_centres_in_the_middle() {
        let cursor = PageCursor::new(10, 50, GENERIC_PAGE_CEILING);
        assert_eq!(cursor.window(PAGE_LINKS), vec![8, 9, 10, 11, 12]);
        assert_eq!(cursor.window(COMPACT_PAGE_LINKS), vec![9, 10, 11]);
    }

    #[test]
    fn window_sticks_to_the_end() {
        let cursor = PageCursor::new(49, 50, GENERIC_PAGE_CEILING);
        assert_eq!(cursor.window(PAGE_LINKS), vec![46, 47, 48, 49, 50]);
        assert_eq!(cursor.window(COMPACT_PAGE_LINKS), vec![48, 49, 50]);
    }

    #[test]
    fn short_lists_show_every_page() {
        let cursor = PageCursor::new(1, 3, GENERIC_PAGE_CEILING);
        assert_eq!(cursor.window(PAGE_LINKS), vec![1, 2, 3]);
    }

    #[test]
    fn single_page_has_no_pagination() {
        assert!(Pagination::for_cursor(&PageCursor::default(), PAGE_LINKS).is_none());
        let p = Pagination::for_cursor(&PageCursor::new(1, 3, 500), PAGE_LINKS).unwrap();
        assert_eq!(p.previous, None);
        assert_eq!(p.next, Some(2));
    }
}
