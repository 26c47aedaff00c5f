use crate::config::{Config, ACCESS_TOKEN_VAR, API_KEY_VAR};
use crate::error::{TmdbError, TmdbResult};
use crate::models::{
    DetailRecord, Genre, GenreList, MediaKind, Movie, MovieDetails, MultiResult, Page, Show,
    ShowDetails, WorkItem,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Query parameters for a single upstream call, in insertion order.
pub type Params<'a> = [(&'a str, String)];

/// Which works a trending request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingScope {
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendingScope::All => "all",
            TrendingScope::Movie => "movie",
            TrendingScope::Tv => "tv",
        }
    }
}

impl FromStr for TrendingScope {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TrendingScope::All),
            "movie" => Ok(TrendingScope::Movie),
            "tv" => Ok(TrendingScope::Tv),
            _ => Err(anyhow::anyhow!("trending scope must be 'all', 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            _ => Err(anyhow::anyhow!("time window must be 'day' or 'week'")),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to the upstream metadata API.
///
/// Implementors only provide [`TmdbApi::fetch`]; every endpoint family is a provided
/// method that builds its path and parameters, then tags the decoded records with
/// their [`MediaKind`].
#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// Performs one authenticated GET and returns the parsed body.
    async fn fetch(&self, endpoint: &str, params: &Params<'_>) -> TmdbResult<Value>;

    async fn popular_movies(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Movie, "/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn top_rated_movies(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Movie, "/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn now_playing_movies(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Movie, "/movie/now_playing", &[("page", page.to_string())])
            .await
    }

    async fn upcoming_movies(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Movie, "/movie/upcoming", &[("page", page.to_string())])
            .await
    }

    async fn popular_shows(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Tv, "/tv/popular", &[("page", page.to_string())])
            .await
    }

    async fn top_rated_shows(&self, page: u32) -> TmdbResult<Page<WorkItem>> {
        self.kind_page(MediaKind::Tv, "/tv/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn genres(&self, kind: MediaKind) -> TmdbResult<Vec<Genre>> {
        let endpoint = format!("/genre/{kind}/list");
        let list: GenreList = decode(&endpoint, self.fetch(&endpoint, &[]).await?)?;
        Ok(list.genres)
    }

    /// Detail record with videos and credits appended in the same round trip.
    async fn details(&self, kind: MediaKind, id: u64) -> TmdbResult<DetailRecord> {
        let endpoint = format!("/{kind}/{id}");
        let params = [("append_to_response", "videos,credits".to_string())];
        let body = self.fetch(&endpoint, &params).await?;
        match kind {
            MediaKind::Movie => Ok(DetailRecord::Movie(decode::<MovieDetails>(&endpoint, body)?)),
            MediaKind::Tv => Ok(DetailRecord::Tv(decode::<ShowDetails>(&endpoint, body)?)),
        }
    }

    async fn movie_details(&self, id: u64) -> TmdbResult<DetailRecord> {
        self.details(MediaKind::Movie, id).await
    }

    async fn show_details(&self, id: u64) -> TmdbResult<DetailRecord> {
        self.details(MediaKind::Tv, id).await
    }

    async fn similar(&self, kind: MediaKind, id: u64) -> TmdbResult<Page<WorkItem>> {
        let endpoint = format!("/{kind}/{id}/similar");
        self.kind_page(kind, &endpoint, &[]).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> TmdbResult<Page<WorkItem>> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.kind_page(MediaKind::Movie, "/search/movie", &params)
            .await
    }

    async fn search_shows(&self, query: &str, page: u32) -> TmdbResult<Page<WorkItem>> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.kind_page(MediaKind::Tv, "/search/tv", &params).await
    }

    /// Combined search; entries keep their upstream `media_type`, people included.
    async fn search_multi(&self, query: &str, page: u32) -> TmdbResult<Page<MultiResult>> {
        let endpoint = "/search/multi";
        let params = [("query", query.to_string()), ("page", page.to_string())];
        decode(endpoint, self.fetch(endpoint, &params).await?)
    }

    async fn trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        page: u32,
    ) -> TmdbResult<Page<WorkItem>> {
        let endpoint = format!("/trending/{}/{}", scope.as_str(), window.as_str());
        let params = [("page", page.to_string())];
        match scope {
            TrendingScope::All => {
                let listing: Page<MultiResult> =
                    decode(&endpoint, self.fetch(&endpoint, &params).await?)?;
                Ok(listing.into_works())
            }
            TrendingScope::Movie => self.kind_page(MediaKind::Movie, &endpoint, &params).await,
            TrendingScope::Tv => self.kind_page(MediaKind::Tv, &endpoint, &params).await,
        }
    }

    /// Discovery sorted by popularity, adult titles excluded.
    async fn discover(
        &self,
        kind: MediaKind,
        genre_ids: &[u32],
        page: u32,
    ) -> TmdbResult<Page<WorkItem>> {
        let endpoint = format!("/discover/{kind}");
        let params = [
            ("with_genres", join_genre_ids(genre_ids)),
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", page.to_string()),
        ];
        self.kind_page(kind, &endpoint, &params).await
    }

    #[doc(hidden)]
    async fn kind_page(
        &self,
        kind: MediaKind,
        endpoint: &str,
        params: &Params<'_>,
    ) -> TmdbResult<Page<WorkItem>> {
        let body = self.fetch(endpoint, params).await?;
        match kind {
            MediaKind::Movie => Ok(decode::<Page<Movie>>(endpoint, body)?.map(WorkItem::Movie)),
            MediaKind::Tv => Ok(decode::<Page<Show>>(endpoint, body)?.map(WorkItem::Tv)),
        }
    }
}

pub fn join_genre_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> TmdbResult<T> {
    serde_json::from_value(body).map_err(|source| TmdbError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// reqwest-backed client. Never retries and never caches.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: Config,
}

impl TmdbClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn credentials(&self) -> TmdbResult<(&str, &str)> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(TmdbError::MissingCredential(API_KEY_VAR))?;
        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(TmdbError::MissingCredential(ACCESS_TOKEN_VAR))?;
        Ok((api_key, token))
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch(&self, endpoint: &str, params: &Params<'_>) -> TmdbResult<Value> {
        let (api_key, token) = self.credentials()?;
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        query.push(("api_key", api_key));
        query.push(("language", self.config.language.as_str()));
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!(endpoint = %endpoint, params = ?params, "TMDB request");
        let transport = |source: reqwest::Error| TmdbError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };
        let res = self
            .client
            .get(&url)
            .query(&query)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }
        let text = res.text().await.map_err(transport)?;
        serde_json::from_str(&text).map_err(|source| TmdbError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(Config::new("key-123", "token-abc").with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn attaches_credentials_and_locale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .and(query_param("api_key", "key-123"))
            .and(query_param("language", "fr-FR"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 2,
                "total_pages": 40,
                "total_results": 800,
                "results": [{ "id": 11, "title": "Star Wars" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).popular_movies(2).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.results[0].kind(), MediaKind::Movie);
        assert_eq!(page.results[0].title(), "Star Wars");
    }

    #[tokio::test]
    async fn non_success_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/999999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .details(MediaKind::Movie, 999_999)
            .await
            .unwrap_err();
        assert!(matches!(err, TmdbError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn details_append_videos_and_credits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1399"))
            .and(query_param("append_to_response", "videos,credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1399,
                "name": "Game of Thrones",
                "episode_run_time": [60],
                "videos": { "results": [] },
                "credits": { "cast": [], "crew": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server).show_details(1399).await.unwrap();
        assert_eq!(record.kind(), MediaKind::Tv);
        assert_eq!(record.runtime_minutes(), Some(60));
    }

    #[tokio::test]
    async fn discover_joins_genres_and_excludes_adult() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/tv"))
            .and(query_param("with_genres", "28,35"))
            .and(query_param("sort_by", "popularity.desc"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "total_pages": 1,
                "total_results": 1,
                "results": [{ "id": 5, "name": "Show" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .discover(MediaKind::Tv, &[28, 35], 1)
            .await
            .unwrap();
        assert_eq!(page.results[0].kind(), MediaKind::Tv);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let server = MockServer::start().await;
        let mut config = Config::new("unused", "token").with_base_url(server.uri());
        config.api_key = None;
        let err = TmdbClient::new(config).popular_movies(1).await.unwrap_err();
        assert!(matches!(err, TmdbError::MissingCredential("TMDB_API_KEY")));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[test]
    fn genre_ids_join_with_commas() {
        assert_eq!(join_genre_ids(&[28, 35]), "28,35");
        assert_eq!(join_genre_ids(&[]), "");
    }
}
