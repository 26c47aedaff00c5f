use crate::config::Config;
use crate::models::MediaKind;
use crate::tmdb::{TimeWindow, TmdbApi, TmdbClient, TrendingScope};
use crate::views::browse::{BrowseTab, BrowseView};
use crate::views::detail::{DetailState, DetailView};
use crate::views::home::HomeView;
use crate::views::search::{SearchParams, SearchView};
use crate::views::trending::TrendingView;
use crate::views::upcoming::UpcomingView;
use crate::widgets::{NotFoundPage, Screen};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const MAX_BODY_BYTES: usize = 16 * 1024; // every route is a GET

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let addr = config.bind;
    info!(
        base_url = %config.base_url,
        language = %config.language,
        "Using TMDB upstream"
    );
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config));
    let app = build_router(AppState { tmdb });

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/movie/:id", get(movie_detail))
        .route("/tv/:id", get(show_detail))
        .route("/search", get(search))
        .route("/movies", get(browse_movies))
        .route("/movies/upcoming", get(upcoming))
        .route("/tv", get(browse_shows))
        .route("/trending", get(trending))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn screen<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(Screen::new(body))).into_response()
}

/// Page numbers from the location; anything unparsable or zero means page 1.
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// `"28,35"` into ids; unparsable entries are skipped.
fn parse_genre_ids(raw: Option<&str>) -> Vec<u32> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> Response {
    screen(StatusCode::NOT_FOUND, NotFoundPage::route())
}

async fn home(State(state): State<AppState>) -> Response {
    let mut view = HomeView::default();
    view.load(state.tmdb.as_ref()).await;
    screen(StatusCode::OK, view.render())
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    detail(state, MediaKind::Movie, id).await
}

async fn show_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    detail(state, MediaKind::Tv, id).await
}

async fn detail(state: AppState, kind: MediaKind, raw_id: String) -> Response {
    let mut view = DetailView::new(kind);
    view.load(state.tmdb.as_ref(), Some(&raw_id)).await;
    match view.state() {
        DetailState::Ready(page) => screen(StatusCode::OK, page.as_ref()),
        DetailState::NotFound | DetailState::Loading => {
            screen(StatusCode::NOT_FOUND, NotFoundPage::for_kind(kind))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchQueryParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchQueryParams>) -> Response {
    let (mut view, fetch) = SearchView::from_location(SearchParams::from_location(
        params.q.as_deref(),
        params.kind.as_deref(),
        params.page.as_deref(),
    ));
    view.run(state.tmdb.as_ref(), fetch).await;
    screen(StatusCode::OK, view.render())
}

#[derive(Debug, Default, Deserialize)]
struct BrowseParams {
    tab: Option<String>,
    page: Option<String>,
    genres: Option<String>,
    layout: Option<String>,
}

async fn browse_movies(State(state): State<AppState>, Query(params): Query<BrowseParams>) -> Response {
    browse(state, MediaKind::Movie, params).await
}

async fn browse_shows(State(state): State<AppState>, Query(params): Query<BrowseParams>) -> Response {
    browse(state, MediaKind::Tv, params).await
}

async fn browse(state: AppState, kind: MediaKind, params: BrowseParams) -> Response {
    let tab = params
        .tab
        .as_deref()
        .and_then(|t| t.parse::<BrowseTab>().ok())
        .unwrap_or(BrowseTab::Popular);
    let genre_ids = parse_genre_ids(params.genres.as_deref());
    debug!(kind = %kind, tab = tab.as_str(), genres = ?genre_ids, "Browse request");

    let mut view = BrowseView::new(kind);
    let fetch = view.restore(tab, parse_page(params.page.as_deref()), &genre_ids);
    view.run(state.tmdb.as_ref(), fetch).await;
    let compact = params.layout.as_deref() == Some("compact");
    screen(StatusCode::OK, view.render(compact))
}

#[derive(Debug, Default, Deserialize)]
struct TrendingParams {
    #[serde(rename = "type")]
    scope: Option<String>,
    window: Option<String>,
    page: Option<String>,
}

async fn trending(State(state): State<AppState>, Query(params): Query<TrendingParams>) -> Response {
    let scope = params
        .scope
        .as_deref()
        .and_then(|s| s.parse::<TrendingScope>().ok())
        .unwrap_or(TrendingScope::All);
    let window = params
        .window
        .as_deref()
        .and_then(|w| w.parse::<TimeWindow>().ok())
        .unwrap_or_default();

    let mut view = TrendingView::new();
    let fetch = view.restore(scope, window, parse_page(params.page.as_deref()));
    view.run(state.tmdb.as_ref(), Some(fetch)).await;
    screen(StatusCode::OK, view.render())
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<String>,
}

async fn upcoming(State(state): State<AppState>, Query(params): Query<PageParams>) -> Response {
    let mut view = UpcomingView::default();
    view.load(state.tmdb.as_ref(), parse_page(params.page.as_deref()))
        .await;
    screen(StatusCode::OK, view.render())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parsing_falls_back_to_first_page() {
        assert_eq!(parse_page(Some("7")), 7);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(None), 1);
    }

    #[test]
    fn genre_ids_skip_garbage() {
        assert_eq!(parse_genre_ids(Some("28, 35,,x")), vec![28, 35]);
        assert!(parse_genre_ids(None).is_empty());
    }
}
