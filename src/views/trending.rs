use super::paged::PagedList;
use super::{FetchResponse, ListQuery, PendingFetch};
use crate::pagination::{PageCursor, Pagination, PAGE_LINKS, TRENDING_PAGE_CEILING};
use crate::tmdb::{TimeWindow, TmdbApi, TrendingScope};
use crate::widgets::{self, Card};
use serde::Serialize;

const SCOPES: [(TrendingScope, &str); 3] = [
    (TrendingScope::All, "Tout"),
    (TrendingScope::Movie, "Films"),
    (TrendingScope::Tv, "Séries"),
];

const WINDOWS: [(TimeWindow, &str); 2] = [
    (TimeWindow::Day, "Aujourd'hui"),
    (TimeWindow::Week, "Cette semaine"),
];

#[derive(Debug)]
pub struct TrendingView {
    scope: TrendingScope,
    window: TimeWindow,
    list: PagedList,
}

impl Default for TrendingView {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendingView {
    pub fn new() -> Self {
        let (scope, window) = (TrendingScope::All, TimeWindow::Day);
        Self {
            scope,
            window,
            list: PagedList::new(ListQuery::Trending { scope, window }, TRENDING_PAGE_CEILING),
        }
    }

    pub fn scope(&self) -> TrendingScope {
        self.scope
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn list(&self) -> &PagedList {
        &self.list
    }

    fn query(&self) -> ListQuery {
        ListQuery::Trending {
            scope: self.scope,
            window: self.window,
        }
    }

    pub fn restore(&mut self, scope: TrendingScope, window: TimeWindow, page: u32) -> PendingFetch {
        self.scope = scope;
        self.window = window;
        self.list.reset_at(self.query(), page)
    }

    /// Back to page 1 under the new scope; `None` if the scope did not change.
    pub fn set_scope(&mut self, scope: TrendingScope) -> Option<PendingFetch> {
        if scope == self.scope {
            return None;
        }
        self.scope = scope;
        Some(self.list.reset_to(self.query()))
    }

    pub fn set_window(&mut self, window: TimeWindow) -> Option<PendingFetch> {
        if window == self.window {
            return None;
        }
        self.window = window;
        Some(self.list.reset_to(self.query()))
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<PendingFetch> {
        self.list.go_to_page(page)
    }

    pub fn apply(&mut self, response: FetchResponse) -> bool {
        self.list.apply(response)
    }

    pub async fn run(&mut self, api: &dyn TmdbApi, fetch: Option<PendingFetch>) {
        if let Some(pending) = fetch {
            self.list.load(api, pending).await;
        }
    }

    pub fn render(&self) -> TrendingPage {
        let cursor = self.list.cursor();
        TrendingPage {
            scope: self.scope,
            window: self.window,
            scopes: SCOPES
                .iter()
                .map(|&(scope, label)| TrendingTab {
                    value: scope.as_str(),
                    label,
                    active: scope == self.scope,
                })
                .collect(),
            windows: WINDOWS
                .iter()
                .map(|&(window, label)| TrendingTab {
                    value: window.as_str(),
                    label,
                    active: window == self.window,
                })
                .collect(),
            loading: self.list.is_loading(),
            cards: widgets::cards(self.list.results()),
            cursor,
            pagination: Pagination::for_cursor(&cursor, PAGE_LINKS).map(Pagination::with_edges),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingTab {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingPage {
    pub scope: TrendingScope,
    pub window: TimeWindow,
    pub scopes: Vec<TrendingTab>,
    pub windows: Vec<TrendingTab>,
    pub loading: bool,
    pub cards: Vec<Card>,
    pub cursor: PageCursor,
    pub pagination: Option<Pagination>,
}
