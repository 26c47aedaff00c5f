use super::{RequestSeq, RequestToken};
use crate::error::{TmdbError, TmdbResult};
use crate::images::{self, BackdropSize, PosterSize};
use crate::models::{CastMember, Credits, CrewMember, DetailRecord, MediaKind, Video, WorkItem};
use crate::tmdb::TmdbApi;
use crate::widgets::{self, Card};
use serde::Serialize;
use tracing::{error, info, warn};

pub const MAX_CAST: usize = 8;
const TRAILER_SITE: &str = "YouTube";

/// First video hosted on YouTube whose type is Trailer or Teaser, in upstream order.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| {
        v.site.eq_ignore_ascii_case(TRAILER_SITE)
            && (v.video_type == "Trailer" || v.video_type == "Teaser")
    })
}

pub fn select_director(credits: &Credits) -> Option<&CrewMember> {
    credits.crew.iter().find(|c| c.job == "Director")
}

pub fn main_cast(credits: &Credits) -> &[CastMember] {
    &credits.cast[..credits.cast.len().min(MAX_CAST)]
}

pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub watch_url: String,
    pub embed_url: String,
}

impl Trailer {
    fn from_video(video: &Video) -> Self {
        Self {
            key: video.key.clone(),
            name: video.name.clone(),
            watch_url: format!("https://www.youtube.com/watch?v={}", video.key),
            embed_url: format!("https://www.youtube.com/embed/{}?autoplay=1", video.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastCard {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_url: String,
}

/// Everything the detail screen shows for one work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPage {
    pub record: DetailRecord,
    pub title: String,
    pub tagline: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub poster_url: String,
    pub backdrop_url: Option<String>,
    pub trailer: Option<Trailer>,
    pub director: Option<String>,
    pub creators: Vec<String>,
    pub cast: Vec<CastCard>,
    pub similar: Vec<Card>,
}

impl DetailPage {
    pub fn build(record: DetailRecord, similar: &[WorkItem]) -> Self {
        let trailer = select_trailer(record.videos()).map(Trailer::from_video);
        let director = match record.kind() {
            MediaKind::Movie => record
                .credits()
                .and_then(select_director)
                .map(|c| c.name.clone()),
            MediaKind::Tv => None,
        };
        let creators = match &record {
            DetailRecord::Tv(d) => d.created_by.iter().map(|c| c.name.clone()).collect(),
            DetailRecord::Movie(_) => Vec::new(),
        };
        let cast = record
            .credits()
            .map(main_cast)
            .unwrap_or_default()
            .iter()
            .map(|c| CastCard {
                id: c.id,
                name: c.name.clone(),
                character: c.character.clone(),
                profile_url: images::profile_url(c.profile_path.as_deref()),
            })
            .collect();

        Self {
            title: record.title().to_string(),
            tagline: record.tagline().map(str::to_string),
            year: record.date().and_then(crate::models::year_of),
            rating: widgets::rating_label(record.vote_average()),
            runtime: record.runtime_minutes().map(format_runtime),
            poster_url: images::poster_url(record.poster_path(), PosterSize::Large),
            backdrop_url: images::backdrop_url(record.backdrop_path(), BackdropSize::Original),
            trailer,
            director,
            creators,
            cast,
            similar: widgets::cards(similar),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    Loading,
    Ready(Box<DetailPage>),
    /// Missing id, unknown id and failed fetch all end here.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct DetailFetch {
    pub token: RequestToken,
    pub kind: MediaKind,
    pub id: u64,
}

impl DetailFetch {
    /// Detail first, then similar works as a second request. A failure of the second
    /// request keeps the detail and leaves the similar row empty.
    pub async fn run(self, api: &dyn TmdbApi) -> DetailResponse {
        let outcome = async {
            let record = api.details(self.kind, self.id).await?;
            let similar = match api.similar(self.kind, self.id).await {
                Ok(page) => page.results,
                Err(e) => {
                    warn!(kind = %self.kind, id = self.id, "Failed to fetch similar works: {}", e);
                    Vec::new()
                }
            };
            Ok::<_, TmdbError>((record, similar))
        }
        .await;
        DetailResponse {
            token: self.token,
            kind: self.kind,
            id: self.id,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct DetailResponse {
    pub token: RequestToken,
    pub kind: MediaKind,
    pub id: u64,
    pub outcome: TmdbResult<(DetailRecord, Vec<WorkItem>)>,
}

#[derive(Debug)]
pub struct DetailView {
    kind: MediaKind,
    state: DetailState,
    seq: RequestSeq,
}

impl DetailView {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            state: DetailState::Loading,
            seq: RequestSeq::default(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Starts loading the work named by the route parameter. An absent or non-numeric
    /// id goes straight to `NotFound`.
    pub fn open(&mut self, raw_id: Option<&str>) -> Option<DetailFetch> {
        let Some(id) = raw_id.and_then(|raw| raw.trim().parse::<u64>().ok()) else {
            info!(kind = %self.kind, raw_id = ?raw_id, "Detail route without a usable id");
            self.seq.invalidate();
            self.state = DetailState::NotFound;
            return None;
        };
        self.state = DetailState::Loading;
        Some(DetailFetch {
            token: self.seq.issue(),
            kind: self.kind,
            id,
        })
    }

    pub fn apply(&mut self, response: DetailResponse) -> bool {
        if !self.seq.is_latest(response.token) {
            return false;
        }
        self.state = match response.outcome {
            Ok((record, similar)) => DetailState::Ready(Box::new(DetailPage::build(record, &similar))),
            Err(e) if e.is_not_found() => {
                info!(kind = %response.kind, id = response.id, "No such work upstream");
                DetailState::NotFound
            }
            Err(e) => {
                error!(kind = %response.kind, id = response.id, "Failed to fetch details: {}", e);
                DetailState::NotFound
            }
        };
        true
    }

    pub async fn load(&mut self, api: &dyn TmdbApi, raw_id: Option<&str>) {
        if let Some(fetch) = self.open(raw_id) {
            let response = fetch.run(api).await;
            self.apply(response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{movie_page, FakeTmdb};
    use serde_json::json;

    fn video(site: &str, kind: &str, key: &str) -> Video {
        Video {
            id: key.to_string(),
            key: key.to_string(),
            name: format!("{kind} {key}"),
            site: site.to_string(),
            video_type: kind.to_string(),
        }
    }

    #[test]
    fn trailer_is_first_youtube_trailer_or_teaser() {
        let videos = vec![
            video("Vimeo", "Trailer", "v1"),
            video("YouTube", "Featurette", "y1"),
            video("YouTube", "Teaser", "y2"),
            video("YouTube", "Trailer", "y3"),
        ];
        assert_eq!(select_trailer(&videos).map(|v| v.key.as_str()), Some("y2"));
        assert!(select_trailer(&videos[..2]).is_none());
    }

    #[test]
    fn runtime_formats_hours_and_minutes() {
        assert_eq!(format_runtime(139), "2h 19min");
        assert_eq!(format_runtime(45), "0h 45min");
    }

    fn fight_club(videos: serde_json::Value) -> serde_json::Value {
        let cast: Vec<_> = (1..=12)
            .map(|i| json!({ "id": i, "name": format!("Actor {i}"), "character": "Role" }))
            .collect();
        json!({
            "id": 550,
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "runtime": 139,
            "vote_average": 8.4,
            "backdrop_path": null,
            "videos": videos,
            "credits": {
                "cast": cast,
                "crew": [
                    { "id": 90, "name": "Jim Uhls", "job": "Screenplay" },
                    { "id": 91, "name": "David Fincher", "job": "Director" },
                    { "id": 92, "name": "Someone Else", "job": "Director" }
                ]
            }
        })
    }

    #[tokio::test]
    async fn movie_detail_extracts_director_cast_and_trailer() {
        let api = FakeTmdb::default()
            .with(
                "/movie/550",
                fight_club(json!({ "results": [{ "key": "SUXWAEX2jlg", "site": "YouTube", "type": "Trailer" }] })),
            )
            .with("/movie/550/similar", movie_page(1, 1, &[807]));
        let mut view = DetailView::new(MediaKind::Movie);
        view.load(&api, Some("550")).await;

        let DetailState::Ready(page) = view.state() else {
            panic!("expected ready state, got {:?}", view.state());
        };
        assert_eq!(page.director.as_deref(), Some("David Fincher"));
        assert_eq!(page.cast.len(), MAX_CAST);
        assert_eq!(page.runtime.as_deref(), Some("2h 19min"));
        assert_eq!(page.trailer.as_ref().unwrap().key, "SUXWAEX2jlg");
        assert!(page.backdrop_url.is_none());
        assert_eq!(page.similar[0].link, "/movie/807");
        assert_eq!(api.param(0, "append_to_response").as_deref(), Some("videos,credits"));
    }

    #[tokio::test]
    async fn no_matching_video_means_no_trailer() {
        let api = FakeTmdb::default()
            .with(
                "/movie/550",
                fight_club(json!({ "results": [{ "key": "x", "site": "YouTube", "type": "Clip" }] })),
            )
            .with("/movie/550/similar", movie_page(1, 1, &[]));
        let mut view = DetailView::new(MediaKind::Movie);
        view.load(&api, Some("550")).await;
        let DetailState::Ready(page) = view.state() else {
            panic!("expected ready state");
        };
        assert!(page.trailer.is_none());
    }

    #[tokio::test]
    async fn missing_or_unknown_id_is_not_found() {
        let api = FakeTmdb::default();
        let mut view = DetailView::new(MediaKind::Movie);
        view.load(&api, None).await;
        assert_eq!(view.state(), &DetailState::NotFound);
        assert!(api.calls().is_empty());

        view.load(&api, Some("abc")).await;
        assert_eq!(view.state(), &DetailState::NotFound);

        view.load(&api, Some("404")).await;
        assert_eq!(view.state(), &DetailState::NotFound);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn show_detail_has_creators_but_no_director() {
        let api = FakeTmdb::default()
            .with(
                "/tv/1396",
                json!({
                    "id": 1396,
                    "name": "Breaking Bad",
                    "first_air_date": "2008-01-20",
                    "episode_run_time": [47, 45],
                    "created_by": [{ "id": 66633, "name": "Vince Gilligan" }],
                    "credits": {
                        "cast": [{ "id": 17419, "name": "Bryan Cranston" }],
                        "crew": [{ "id": 1, "name": "Michelle MacLaren", "job": "Director" }]
                    }
                }),
            );
        let mut view = DetailView::new(MediaKind::Tv);
        view.load(&api, Some("1396")).await;

        let DetailState::Ready(page) = view.state() else {
            panic!("expected ready state");
        };
        assert!(page.director.is_none());
        assert_eq!(page.creators, vec!["Vince Gilligan".to_string()]);
        assert_eq!(page.runtime.as_deref(), Some("0h 47min"));
        assert!(page.similar.is_empty());
    }

    #[tokio::test]
    async fn superseded_detail_response_is_ignored() {
        let api = FakeTmdb::default()
            .with("/movie/1", fight_club(json!({ "results": [] })))
            .with("/movie/2", fight_club(json!({ "results": [] })));
        let mut view = DetailView::new(MediaKind::Movie);
        let first = view.open(Some("1")).unwrap();
        let second = view.open(Some("2")).unwrap();
        let late = first.run(&api).await;
        let fresh = second.run(&api).await;
        assert!(view.apply(fresh));
        assert!(!view.apply(late));
        assert!(matches!(view.state(), DetailState::Ready(_)));
    }
}
