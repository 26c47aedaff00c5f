//! Stateful view models for each application route.
//!
//! A view never awaits while holding its own state: operations that need data return a
//! pending fetch stamped with a request token, the caller runs it against a
//! [`TmdbApi`], and hands the response back to `apply`. Responses whose token is no
//! longer the latest are dropped, so a slow earlier request can never overwrite a newer
//! one. Each view also offers `async` shorthands that do all three steps in sequence.

use crate::error::TmdbResult;
use crate::models::{MediaKind, Page, WorkItem};
use crate::tmdb::{TimeWindow, TmdbApi, TrendingScope};

pub mod browse;
pub mod detail;
pub mod home;
pub mod paged;
pub mod search;
pub mod trending;
pub mod upcoming;

pub use search::MediaFilter;

/// Identifies one fetch of one result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic token source; only the most recently issued token is current.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Supersedes whatever is in flight without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// The upstream listing a paged list is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    Popular(MediaKind),
    TopRated(MediaKind),
    NowPlaying,
    Upcoming,
    Discover {
        kind: MediaKind,
        genre_ids: Vec<u32>,
    },
    Trending {
        scope: TrendingScope,
        window: TimeWindow,
    },
    Search {
        filter: MediaFilter,
        query: String,
    },
}

impl ListQuery {
    pub async fn fetch(&self, api: &dyn TmdbApi, page: u32) -> TmdbResult<Page<WorkItem>> {
        match self {
            ListQuery::Popular(MediaKind::Movie) => api.popular_movies(page).await,
            ListQuery::Popular(MediaKind::Tv) => api.popular_shows(page).await,
            ListQuery::TopRated(MediaKind::Movie) => api.top_rated_movies(page).await,
            ListQuery::TopRated(MediaKind::Tv) => api.top_rated_shows(page).await,
            ListQuery::NowPlaying => api.now_playing_movies(page).await,
            ListQuery::Upcoming => api.upcoming_movies(page).await,
            ListQuery::Discover { kind, genre_ids } => api.discover(*kind, genre_ids, page).await,
            ListQuery::Trending { scope, window } => api.trending(*scope, *window, page).await,
            ListQuery::Search { filter, query } => match filter {
                MediaFilter::Movie => api.search_movies(query, page).await,
                MediaFilter::Tv => api.search_shows(query, page).await,
                MediaFilter::All => Ok(api.search_multi(query, page).await?.into_works()),
            },
        }
    }
}

/// A fetch a view asked for but has not received yet.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub query: ListQuery,
    pub page: u32,
}

impl PendingFetch {
    pub async fn run(self, api: &dyn TmdbApi) -> FetchResponse {
        let result = self.query.fetch(api, self.page).await;
        FetchResponse {
            token: self.token,
            page: self.page,
            result,
        }
    }
}

#[derive(Debug)]
pub struct FetchResponse {
    pub token: RequestToken,
    pub page: u32,
    pub result: TmdbResult<Page<WorkItem>>,
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::{TmdbError, TmdbResult};
    use crate::tmdb::{Params, TmdbApi};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned upstream keyed by endpoint; records every call with its parameters.
    #[derive(Default)]
    pub struct FakeTmdb {
        pub responses: Mutex<HashMap<String, Value>>,
        pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeTmdb {
        pub fn with(self, endpoint: &str, body: Value) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(endpoint.to_string(), body);
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn param(&self, call: usize, key: &str) -> Option<String> {
            self.calls()
                .get(call)
                .and_then(|(_, params)| params.iter().find(|(k, _)| k == key))
                .map(|(_, v)| v.clone())
        }
    }

    #[async_trait::async_trait]
    impl TmdbApi for FakeTmdb {
        async fn fetch(&self, endpoint: &str, params: &Params<'_>) -> TmdbResult<Value> {
            self.calls.lock().unwrap().push((
                endpoint.to_string(),
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ));
            self.responses
                .lock()
                .unwrap()
                .get(endpoint)
                .cloned()
                .ok_or_else(|| TmdbError::Status {
                    status: 404,
                    endpoint: endpoint.to_string(),
                })
        }
    }

    pub fn movie_page(page: u32, total_pages: u32, ids: &[u64]) -> Value {
        json!({
            "page": page,
            "total_pages": total_pages,
            "total_results": total_pages * 20,
            "results": ids
                .iter()
                .map(|id| json!({ "id": id, "title": format!("Movie {id}"), "release_date": "2024-05-01", "vote_average": 7.25 }))
                .collect::<Vec<_>>()
        })
    }

    pub fn show_page(page: u32, total_pages: u32, ids: &[u64]) -> Value {
        json!({
            "page": page,
            "total_pages": total_pages,
            "total_results": total_pages * 20,
            "results": ids
                .iter()
                .map(|id| json!({ "id": id, "name": format!("Show {id}"), "first_air_date": "2023-01-10" }))
                .collect::<Vec<_>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let mut seq = RequestSeq::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        seq.invalidate();
        assert!(!seq.is_latest(second));
    }
}
