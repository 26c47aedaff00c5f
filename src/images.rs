pub const IMG_BASE_URL: &str = "https://image.tmdb.org/t/p/";
pub const PLACEHOLDER: &str = "/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropSize {
    Small,
    Medium,
    Large,
    Original,
}

impl BackdropSize {
    pub fn token(self) -> &'static str {
        match self {
            BackdropSize::Small => "w300",
            BackdropSize::Medium => "w780",
            BackdropSize::Large => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    Small,
    Medium,
    Large,
    Original,
}

impl PosterSize {
    pub fn token(self) -> &'static str {
        match self {
            PosterSize::Small => "w154",
            PosterSize::Medium => "w342",
            PosterSize::Large => "w500",
            PosterSize::Original => "original",
        }
    }
}

fn join(size: &str, path: &str) -> String {
    format!("{IMG_BASE_URL}{size}{path}")
}

/// Poster URL, or the local placeholder when upstream has no poster.
pub fn poster_url(path: Option<&str>, size: PosterSize) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => join(size.token(), p),
        None => PLACEHOLDER.to_string(),
    }
}

/// Backdrops are decorative; absence yields no image at all.
pub fn backdrop_url(path: Option<&str>, size: BackdropSize) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| join(size.token(), p))
}

pub fn profile_url(path: Option<&str>) -> String {
    poster_url(path, PosterSize::Small)
}
