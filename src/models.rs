use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of work the catalog knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(anyhow::anyhow!("media kind must be 'movie' or 'tv'")),
        }
    }
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_default")]
    pub adult: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub original_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_country: Vec<String>,
}

/// A movie or a show, tagged at the fetching boundary.
///
/// Kind-specific endpoints tag by endpoint; combined endpoints go through
/// [`MultiResult`]. Nothing downstream inspects fields to tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum WorkItem {
    Movie(Movie),
    Tv(Show),
}

impl WorkItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            WorkItem::Movie(_) => MediaKind::Movie,
            WorkItem::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            WorkItem::Movie(m) => m.id,
            WorkItem::Tv(s) => s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WorkItem::Movie(m) => &m.title,
            WorkItem::Tv(s) => &s.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            WorkItem::Movie(m) => &m.overview,
            WorkItem::Tv(s) => &s.overview,
        }
    }

    /// Release date for movies, first air date for shows.
    pub fn date(&self) -> Option<&str> {
        match self {
            WorkItem::Movie(m) => m.release_date.as_deref(),
            WorkItem::Tv(s) => s.first_air_date.as_deref(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.date().and_then(year_of)
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            WorkItem::Movie(m) => m.poster_path.as_deref(),
            WorkItem::Tv(s) => s.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            WorkItem::Movie(m) => m.backdrop_path.as_deref(),
            WorkItem::Tv(s) => s.backdrop_path.as_deref(),
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            WorkItem::Movie(m) => m.vote_average,
            WorkItem::Tv(s) => s.vote_average,
        }
    }
}

impl From<Movie> for WorkItem {
    fn from(movie: Movie) -> Self {
        WorkItem::Movie(movie)
    }
}

impl From<Show> for WorkItem {
    fn from(show: Show) -> Self {
        WorkItem::Tv(show)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Entry returned by the combined search and trending endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MultiResult {
    Movie(Movie),
    Tv(Show),
    Person(Person),
    #[serde(other)]
    Other,
}

impl MultiResult {
    pub fn into_work(self) -> Option<WorkItem> {
        match self {
            MultiResult::Movie(m) => Some(WorkItem::Movie(m)),
            MultiResult::Tv(s) => Some(WorkItem::Tv(s)),
            MultiResult::Person(_) | MultiResult::Other => None,
        }
    }
}

/// List envelope shared by every paged endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

impl Page<MultiResult> {
    /// Drops person (and unknown) entries; the envelope totals stay as upstream reported.
    pub fn into_works(self) -> Page<WorkItem> {
        Page {
            page: self.page,
            results: self
                .results
                .into_iter()
                .filter_map(MultiResult::into_work)
                .collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_default")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, deserialize_with = "null_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub revenue: u64,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    #[serde(flatten)]
    pub show: Show,
    #[serde(default, deserialize_with = "null_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_default")]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub created_by: Vec<Creator>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Detail lookup result with the appended videos and credits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum DetailRecord {
    Movie(MovieDetails),
    Tv(ShowDetails),
}

impl DetailRecord {
    pub fn kind(&self) -> MediaKind {
        match self {
            DetailRecord::Movie(_) => MediaKind::Movie,
            DetailRecord::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            DetailRecord::Movie(d) => d.movie.id,
            DetailRecord::Tv(d) => d.show.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            DetailRecord::Movie(d) => &d.movie.title,
            DetailRecord::Tv(d) => &d.show.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            DetailRecord::Movie(d) => &d.movie.overview,
            DetailRecord::Tv(d) => &d.show.overview,
        }
    }

    pub fn date(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(d) => d.movie.release_date.as_deref(),
            DetailRecord::Tv(d) => d.show.first_air_date.as_deref(),
        }
    }

    pub fn tagline(&self) -> Option<&str> {
        let tagline = match self {
            DetailRecord::Movie(d) => d.tagline.as_deref(),
            DetailRecord::Tv(d) => d.tagline.as_deref(),
        };
        tagline.filter(|t| !t.trim().is_empty())
    }

    pub fn genres(&self) -> &[Genre] {
        match self {
            DetailRecord::Movie(d) => &d.genres,
            DetailRecord::Tv(d) => &d.genres,
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            DetailRecord::Movie(d) => d.movie.vote_average,
            DetailRecord::Tv(d) => d.show.vote_average,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(d) => d.movie.poster_path.as_deref(),
            DetailRecord::Tv(d) => d.show.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(d) => d.movie.backdrop_path.as_deref(),
            DetailRecord::Tv(d) => d.show.backdrop_path.as_deref(),
        }
    }

    pub fn videos(&self) -> &[Video] {
        let list = match self {
            DetailRecord::Movie(d) => d.videos.as_ref(),
            DetailRecord::Tv(d) => d.videos.as_ref(),
        };
        list.map(|l| l.results.as_slice()).unwrap_or_default()
    }

    pub fn credits(&self) -> Option<&Credits> {
        match self {
            DetailRecord::Movie(d) => d.credits.as_ref(),
            DetailRecord::Tv(d) => d.credits.as_ref(),
        }
    }

    /// Movie runtime, or the first listed episode runtime for shows.
    pub fn runtime_minutes(&self) -> Option<u32> {
        match self {
            DetailRecord::Movie(d) => d.runtime.filter(|r| *r > 0),
            DetailRecord::Tv(d) => d.episode_run_time.first().copied(),
        }
    }
}

/// Year of an upstream `YYYY-MM-DD` date; empty or malformed dates yield `None`.
pub fn year_of(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
