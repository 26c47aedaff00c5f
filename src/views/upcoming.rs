use super::paged::PagedList;
use super::{FetchResponse, ListQuery, PendingFetch};
use crate::pagination::{PageCursor, Pagination, PAGE_LINKS, UPCOMING_PAGE_CEILING};
use crate::tmdb::TmdbApi;
use crate::widgets::{self, Card};
use serde::Serialize;

/// Upcoming releases, one paged list.
#[derive(Debug)]
pub struct UpcomingView {
    list: PagedList,
}

impl Default for UpcomingView {
    fn default() -> Self {
        Self {
            list: PagedList::new(ListQuery::Upcoming, UPCOMING_PAGE_CEILING),
        }
    }
}

impl UpcomingView {
    pub fn list(&self) -> &PagedList {
        &self.list
    }

    pub fn open_at(&mut self, page: u32) -> PendingFetch {
        self.list.open_at(page)
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<PendingFetch> {
        self.list.go_to_page(page)
    }

    pub fn apply(&mut self, response: FetchResponse) -> bool {
        self.list.apply(response)
    }

    pub async fn load(&mut self, api: &dyn TmdbApi, page: u32) {
        let pending = self.open_at(page);
        self.list.load(api, pending).await;
    }

    pub fn render(&self) -> UpcomingPage {
        let cursor = self.list.cursor();
        UpcomingPage {
            title: "Prochainement au cinéma",
            loading: self.list.is_loading(),
            cards: widgets::cards(self.list.results()),
            cursor,
            pagination: Pagination::for_cursor(&cursor, PAGE_LINKS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingPage {
    pub title: &'static str,
    pub loading: bool,
    pub cards: Vec<Card>,
    pub cursor: PageCursor,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{movie_page, FakeTmdb};

    #[tokio::test]
    async fn upcoming_total_is_clamped_to_twenty() {
        let api = FakeTmdb::default().with("/movie/upcoming", movie_page(2, 63, &[1, 2]));
        let mut view = UpcomingView::default();
        view.load(&api, 2).await;

        let page = view.render();
        assert_eq!(page.cursor.current, 2);
        assert_eq!(page.cursor.total, 20);
        assert!(view.go_to_page(21).is_none());
        assert!(view.go_to_page(20).is_some());
    }

    #[tokio::test]
    async fn location_page_past_twenty_lands_on_the_last_page() {
        let api = FakeTmdb::default().with("/movie/upcoming", movie_page(1, 63, &[1]));
        let mut view = UpcomingView::default();
        view.load(&api, 50).await;

        assert_eq!(api.param(0, "page").as_deref(), Some("20"));
        let page = view.render();
        assert_eq!(page.cursor.current, 20);
        assert_eq!(page.cursor.total, 20);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.previous, Some(19));
        assert_eq!(pagination.next, None);
    }
}
