use super::paged::PagedList;
use super::{FetchResponse, ListQuery, PendingFetch};
use crate::pagination::{Pagination, GENERIC_PAGE_CEILING, PAGE_LINKS};
use crate::tmdb::TmdbApi;
use crate::widgets::{self, Card};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Which kinds of work a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl MediaFilter {
    pub const ALL: [MediaFilter; 3] = [MediaFilter::All, MediaFilter::Movie, MediaFilter::Tv];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaFilter::All => "all",
            MediaFilter::Movie => "movie",
            MediaFilter::Tv => "tv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaFilter::All => "Tout",
            MediaFilter::Movie => "Films",
            MediaFilter::Tv => "Séries",
        }
    }

    /// Anything other than `movie` or `tv` means all.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "movie" => MediaFilter::Movie,
            "tv" => MediaFilter::Tv,
            _ => MediaFilter::All,
        }
    }
}

/// The part of a search that lives in the location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    pub query: String,
    pub filter: MediaFilter,
    pub page: u32,
}

impl SearchParams {
    /// Builds the params from already-decoded location values. An unknown `kind` means
    /// all; a missing, zero or unparsable page means page 1.
    pub fn from_location(query: Option<&str>, kind: Option<&str>, page: Option<&str>) -> Self {
        Self {
            query: query.unwrap_or_default().to_string(),
            filter: kind.map(MediaFilter::parse_lenient).unwrap_or_default(),
            page: page
                .and_then(|p| p.trim().parse().ok())
                .filter(|p| *p > 0)
                .unwrap_or(1),
        }
    }

    /// `/search?q=..` with `type` omitted for all and `page` omitted for page 1.
    pub fn to_location(&self) -> String {
        let mut location = format!("/search?q={}", urlencoding::encode(&self.query));
        if self.filter != MediaFilter::All {
            location.push_str("&type=");
            location.push_str(self.filter.as_str());
        }
        if self.page > 1 {
            location.push_str(&format!("&page={}", self.page));
        }
        location
    }
}

#[derive(Debug)]
pub struct SearchView {
    input: String,
    filter: MediaFilter,
    list: PagedList,
    searched: Option<String>,
    location: String,
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchView {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            filter: MediaFilter::All,
            list: PagedList::new(
                ListQuery::Search {
                    filter: MediaFilter::All,
                    query: String::new(),
                },
                GENERIC_PAGE_CEILING,
            ),
            searched: None,
            location: "/search".to_string(),
        }
    }

    /// Restores the view from location params and fetches if they name a query.
    pub fn from_location(params: SearchParams) -> (Self, Option<PendingFetch>) {
        let mut view = Self::new();
        let fetch = view.mount(params);
        (view, fetch)
    }

    pub fn mount(&mut self, params: SearchParams) -> Option<PendingFetch> {
        self.input = params.query;
        self.filter = params.filter;
        self.search_at(params.page)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn filter(&self) -> MediaFilter {
        self.filter
    }

    pub fn list(&self) -> &PagedList {
        &self.list
    }

    /// The query the current results belong to; `None` before any search.
    pub fn searched(&self) -> Option<&str> {
        self.searched.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn submit(&mut self) -> Option<PendingFetch> {
        self.search_at(1)
    }

    pub fn set_filter(&mut self, filter: MediaFilter) -> Option<PendingFetch> {
        self.filter = filter;
        self.search_at(1)
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<PendingFetch> {
        self.searched.as_ref()?;
        self.list.go_to_page(page)
    }

    /// Applies a response and, when it succeeded, rewrites the location to match.
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        let succeeded = response.result.is_ok();
        if !self.list.apply(response) {
            return false;
        }
        if succeeded {
            if let ListQuery::Search { filter, query } = self.list.query() {
                self.location = SearchParams {
                    query: query.clone(),
                    filter: *filter,
                    page: self.list.cursor().current,
                }
                .to_location();
            }
        }
        true
    }

    /// Runs the fetch and, if the page overshot the last one, the follow-up for it.
    pub async fn run(&mut self, api: &dyn TmdbApi, fetch: Option<PendingFetch>) {
        let mut next = fetch;
        while let Some(pending) = next.take() {
            let response = pending.run(api).await;
            if self.apply(response) {
                next = self.list.take_refetch();
            }
        }
    }

    fn search_at(&mut self, page: u32) -> Option<PendingFetch> {
        let query = self.input.trim();
        if query.is_empty() {
            debug!("Blank search, clearing results");
            self.list.clear();
            self.searched = None;
            self.location = "/search".to_string();
            return None;
        }
        let query = query.to_string();
        self.searched = Some(query.clone());
        Some(self.list.reset_at(
            ListQuery::Search {
                filter: self.filter,
                query,
            },
            page,
        ))
    }

    pub fn render(&self) -> SearchPage {
        let results = self.searched.as_ref().map(|query| {
            let cursor = self.list.cursor();
            SearchResults {
                query: query.clone(),
                loading: self.list.is_loading(),
                total_results: self.list.total_results(),
                cards: widgets::cards(self.list.results()),
                pagination: Pagination::for_cursor(&cursor, PAGE_LINKS),
            }
        });
        SearchPage {
            input: self.input.clone(),
            filter: self.filter,
            filters: MediaFilter::ALL
                .iter()
                .map(|f| FilterChip {
                    filter: *f,
                    label: f.label(),
                    active: *f == self.filter,
                    href: self.filter_href(*f),
                })
                .collect(),
            location: self.location.clone(),
            results,
        }
    }

    fn filter_href(&self, filter: MediaFilter) -> Cow<'static, str> {
        match &self.searched {
            Some(query) => Cow::Owned(
                SearchParams {
                    query: query.clone(),
                    filter,
                    page: 1,
                }
                .to_location(),
            ),
            None => Cow::Borrowed("/search"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChip {
    pub filter: MediaFilter,
    pub label: &'static str,
    pub active: bool,
    pub href: Cow<'static, str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub loading: bool,
    pub total_results: u32,
    pub cards: Vec<Card>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub input: String,
    pub filter: MediaFilter,
    pub filters: Vec<FilterChip>,
    pub location: String,
    /// Absent until a non-blank query has been searched.
    pub results: Option<SearchResults>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use crate::views::testing::{movie_page, show_page, FakeTmdb};
    use serde_json::json;

    fn located(query: &str, kind: Option<&str>, page: Option<&str>) -> SearchParams {
        SearchParams::from_location(Some(query), kind, page)
    }

    #[test]
    fn location_values_fall_back_to_defaults() {
        let params = located("la haine!", Some("TV"), Some("3"));
        assert_eq!(params.query, "la haine!");
        assert_eq!(params.filter, MediaFilter::Tv);
        assert_eq!(params.page, 3);

        let params = located("dune", Some("person"), Some("zero"));
        assert_eq!(params.filter, MediaFilter::All);
        assert_eq!(params.page, 1);
        assert_eq!(located("dune", None, Some("0")).page, 1);
        assert_eq!(SearchParams::from_location(None, None, None).query, "");
    }

    #[test]
    fn location_omits_defaults() {
        let mut params = SearchParams {
            query: "la haine".into(),
            filter: MediaFilter::All,
            page: 1,
        };
        assert_eq!(params.to_location(), "/search?q=la%20haine");
        params.filter = MediaFilter::Movie;
        params.page = 4;
        assert_eq!(params.to_location(), "/search?q=la%20haine&type=movie&page=4");
    }

    #[tokio::test]
    async fn multi_search_drops_people() {
        let api = FakeTmdb::default().with(
            "/search/multi",
            json!({
                "page": 1,
                "total_pages": 1,
                "total_results": 3,
                "results": [
                    { "media_type": "movie", "id": 1, "title": "Alien" },
                    { "media_type": "person", "id": 2, "name": "Sigourney Weaver" },
                    { "media_type": "tv", "id": 3, "name": "Alien: Earth" }
                ]
            }),
        );
        let (mut view, fetch) = SearchView::from_location(located("alien", None, None));
        view.run(&api, fetch).await;

        let page = view.render();
        let results = page.results.unwrap();
        assert_eq!(results.cards.len(), 2);
        assert_eq!(results.cards[0].media_type, MediaKind::Movie);
        assert_eq!(results.cards[1].media_type, MediaKind::Tv);
        assert_eq!(api.param(0, "query").as_deref(), Some("alien"));
    }

    #[tokio::test]
    async fn new_query_resets_page_and_rewrites_location() {
        let api = FakeTmdb::default().with("/search/movie", movie_page(1, 9, &[1, 2]));
        let (mut view, fetch) = SearchView::from_location(located("alien", Some("movie"), Some("3")));
        view.run(&api, fetch).await;
        assert_eq!(view.location(), "/search?q=alien&type=movie&page=3");
        assert_eq!(api.param(0, "page").as_deref(), Some("3"));

        view.set_input("blade runner");
        let fetch = view.submit();
        view.run(&api, fetch).await;
        assert_eq!(api.param(1, "page").as_deref(), Some("1"));
        assert_eq!(view.location(), "/search?q=blade%20runner&type=movie");

        let fetch = view.set_filter(MediaFilter::All);
        assert!(fetch.is_some());
        assert_eq!(view.filter(), MediaFilter::All);
    }

    #[tokio::test]
    async fn filter_change_requests_first_page() {
        let api = FakeTmdb::default()
            .with("/search/movie", movie_page(1, 9, &[1, 2]))
            .with("/search/tv", show_page(1, 4, &[7]));
        let (mut view, fetch) = SearchView::from_location(located("x", Some("movie"), Some("3")));
        view.run(&api, fetch).await;
        assert_eq!(view.location(), "/search?q=x&type=movie&page=3");

        let fetch = view.set_filter(MediaFilter::Tv);
        view.run(&api, fetch).await;
        let calls = api.calls();
        assert_eq!(calls.last().map(|(e, _)| e.as_str()), Some("/search/tv"));
        assert_eq!(api.param(calls.len() - 1, "page").as_deref(), Some("1"));
        assert_eq!(view.list().cursor().current, 1);
        assert_eq!(view.location(), "/search?q=x&type=tv");
    }

    #[tokio::test]
    async fn page_past_the_last_is_rewritten_in_the_location() {
        let api = FakeTmdb::default().with("/search/movie", movie_page(1, 2, &[1]));
        let (mut view, fetch) = SearchView::from_location(located("alien", Some("movie"), Some("999")));
        view.run(&api, fetch).await;

        assert_eq!(api.param(0, "page").as_deref(), Some("500"));
        assert_eq!(api.param(1, "page").as_deref(), Some("2"));
        assert_eq!(view.list().cursor().current, 2);
        assert_eq!(view.location(), "/search?q=alien&type=movie&page=2");
        assert_eq!(view.render().results.unwrap().cards.len(), 1);
    }

    #[tokio::test]
    async fn blank_query_makes_no_request() {
        let api = FakeTmdb::default().with("/search/multi", movie_page(1, 1, &[1]));
        let (mut view, fetch) = SearchView::from_location(located("   ", None, None));
        assert!(fetch.is_none());
        view.run(&api, fetch).await;
        assert!(api.calls().is_empty());
        assert!(view.render().results.is_none());
        assert!(view.go_to_page(2).is_none());
    }

    #[tokio::test]
    async fn blank_submit_discards_in_flight_search() {
        let api = FakeTmdb::default().with("/search/multi", movie_page(1, 1, &[1]));
        let mut view = SearchView::new();
        view.set_input("alien");
        let in_flight = view.submit().unwrap();
        view.set_input("  ");
        assert!(view.submit().is_none());
        let response = in_flight.run(&api).await;
        assert!(!view.apply(response));
        assert!(view.list().results().is_empty());
        assert_eq!(view.location(), "/search");
    }
}
