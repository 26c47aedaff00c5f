use super::{FetchResponse, ListQuery, PendingFetch, RequestSeq};
use crate::models::WorkItem;
use crate::pagination::PageCursor;
use crate::tmdb::TmdbApi;
use tracing::{debug, error};

/// One result list with its own cursor and request tokens.
#[derive(Debug)]
pub struct PagedList {
    query: ListQuery,
    ceiling: u32,
    cursor: PageCursor,
    results: Vec<WorkItem>,
    total_results: u32,
    loaded: bool,
    loading: bool,
    scroll_to_top: bool,
    refetch: bool,
    seq: RequestSeq,
}

impl PagedList {
    pub fn new(query: ListQuery, ceiling: u32) -> Self {
        Self {
            query,
            ceiling,
            cursor: PageCursor::default(),
            results: Vec::new(),
            total_results: 0,
            loaded: false,
            loading: false,
            scroll_to_top: false,
            refetch: false,
            seq: RequestSeq::default(),
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn results(&self) -> &[WorkItem] {
        &self.results
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetches the current page again.
    pub fn refresh(&mut self) -> PendingFetch {
        self.request(self.cursor.current)
    }

    /// Opens the list at a page taken from the location. Only the ceiling is known
    /// before the first response; a page past the upstream total is corrected in
    /// [`PagedList::apply`].
    pub fn open_at(&mut self, page: u32) -> PendingFetch {
        self.request(page.clamp(1, self.ceiling))
    }

    /// Rebinds the list to a new listing and starts over from page 1.
    pub fn reset_to(&mut self, query: ListQuery) -> PendingFetch {
        self.query = query;
        self.cursor = PageCursor::default();
        self.request(1)
    }

    /// Same as [`PagedList::reset_to`] but lands on `page`.
    pub fn reset_at(&mut self, query: ListQuery, page: u32) -> PendingFetch {
        self.query = query;
        self.cursor = PageCursor::default();
        self.open_at(page)
    }

    /// `None` (and no state change) when `page` is outside `[1, total]`.
    pub fn go_to_page(&mut self, page: u32) -> Option<PendingFetch> {
        if !self.cursor.contains(page) {
            debug!(page, total = self.cursor.total, "Ignoring out-of-range page");
            return None;
        }
        self.scroll_to_top = true;
        Some(self.request(page))
    }

    /// Empties the list without a request and discards anything in flight.
    pub fn clear(&mut self) {
        self.seq.invalidate();
        self.cursor = PageCursor::default();
        self.results.clear();
        self.total_results = 0;
        self.loaded = false;
        self.loading = false;
        self.refetch = false;
    }

    /// Returns whether the response was current. A failed fetch leaves the previous
    /// results and cursor in place.
    ///
    /// A response for a page past the last one moves the cursor to the last page,
    /// empties the results and queues a refetch (see [`PagedList::take_refetch`]).
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        if !self.seq.is_latest(response.token) {
            debug!(page = response.page, "Dropping stale list response");
            return false;
        }
        self.loading = false;
        match response.result {
            Ok(listing) => {
                self.cursor = PageCursor::new(response.page, listing.total_pages, self.ceiling);
                self.total_results = listing.total_results;
                self.loaded = true;
                if self.cursor.current < response.page {
                    debug!(
                        requested = response.page,
                        last = self.cursor.current,
                        "Requested page is past the end, falling back to the last page"
                    );
                    self.results.clear();
                    self.refetch = true;
                } else {
                    self.results = listing.results;
                }
            }
            Err(e) => {
                error!(query = ?self.query, page = response.page, "Failed to fetch list: {}", e);
            }
        }
        true
    }

    /// The fetch queued when a response overshot the last page.
    pub fn take_refetch(&mut self) -> Option<PendingFetch> {
        std::mem::take(&mut self.refetch).then(|| self.refresh())
    }

    pub async fn load(&mut self, api: &dyn TmdbApi, pending: PendingFetch) -> bool {
        let response = pending.run(api).await;
        let current = self.apply(response);
        if let Some(retry) = self.take_refetch() {
            let response = retry.run(api).await;
            self.apply(response);
        }
        current
    }

    /// Consumes the scroll-to-top request raised by a page change.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    fn request(&mut self, page: u32) -> PendingFetch {
        self.loading = true;
        self.refetch = false;
        PendingFetch {
            token: self.seq.issue(),
            query: self.query.clone(),
            page,
        }
    }
}
