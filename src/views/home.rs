use super::{RequestSeq, RequestToken};
use crate::error::TmdbResult;
use crate::models::{Page, WorkItem};
use crate::tmdb::{TimeWindow, TmdbApi, TrendingScope};
use crate::widgets::{Carousel, Hero};
use serde::Serialize;
use tracing::error;

const HERO_POOL: usize = 5;

/// One of the first few trending works, chosen by `seed`.
pub fn pick_hero(items: &[WorkItem], seed: u64) -> Option<&WorkItem> {
    let pool = items.len().min(HERO_POOL);
    if pool == 0 {
        return None;
    }
    items.get((seed % pool as u64) as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
    Trending,
    PopularMovies,
    PopularShows,
    TopRatedMovies,
}

impl HomeSection {
    /// Load order; the first failure stops the sequence.
    pub const ORDER: [HomeSection; 4] = [
        HomeSection::Trending,
        HomeSection::PopularMovies,
        HomeSection::PopularShows,
        HomeSection::TopRatedMovies,
    ];

    pub fn title(self) -> &'static str {
        match self {
            HomeSection::Trending => "En tendance",
            HomeSection::PopularMovies => "Films populaires",
            HomeSection::PopularShows => "Séries populaires",
            HomeSection::TopRatedMovies => "Films les mieux notés",
        }
    }

    async fn fetch(self, api: &dyn TmdbApi) -> TmdbResult<Page<WorkItem>> {
        match self {
            HomeSection::Trending => api.trending(TrendingScope::All, TimeWindow::Day, 1).await,
            HomeSection::PopularMovies => api.popular_movies(1).await,
            HomeSection::PopularShows => api.popular_shows(1).await,
            HomeSection::TopRatedMovies => api.top_rated_movies(1).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomeFetch {
    pub token: RequestToken,
    pub seed: u64,
}

impl HomeFetch {
    pub async fn run(self, api: &dyn TmdbApi) -> HomeResponse {
        let mut sections = Vec::with_capacity(HomeSection::ORDER.len());
        let mut failed = false;
        for section in HomeSection::ORDER {
            match section.fetch(api).await {
                Ok(page) => sections.push((section, page.results)),
                Err(e) => {
                    error!(section = section.title(), "Failed to load home page: {}", e);
                    failed = true;
                    break;
                }
            }
        }
        HomeResponse {
            token: self.token,
            seed: self.seed,
            sections,
            failed,
        }
    }
}

#[derive(Debug)]
pub struct HomeResponse {
    pub token: RequestToken,
    pub seed: u64,
    pub sections: Vec<(HomeSection, Vec<WorkItem>)>,
    pub failed: bool,
}

#[derive(Debug, Default)]
pub struct HomeView {
    sections: Vec<(HomeSection, Vec<WorkItem>)>,
    hero: Option<WorkItem>,
    loading: bool,
    failed: bool,
    seq: RequestSeq,
}

impl HomeView {
    pub fn begin(&mut self, seed: u64) -> HomeFetch {
        self.loading = true;
        HomeFetch {
            token: self.seq.issue(),
            seed,
        }
    }

    pub fn section(&self, section: HomeSection) -> Option<&[WorkItem]> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, items)| items.as_slice())
    }

    pub fn hero(&self) -> Option<&WorkItem> {
        self.hero.as_ref()
    }

    pub fn apply(&mut self, response: HomeResponse) -> bool {
        if !self.seq.is_latest(response.token) {
            return false;
        }
        self.loading = false;
        self.failed = response.failed;
        self.sections = response.sections;
        self.hero = self
            .section(HomeSection::Trending)
            .and_then(|items| pick_hero(items, response.seed))
            .cloned();
        true
    }

    /// Loads every section with a hero seed taken from the clock.
    pub async fn load(&mut self, api: &dyn TmdbApi) {
        let seed = chrono::Utc::now().timestamp_subsec_nanos() as u64;
        let response = self.begin(seed).run(api).await;
        self.apply(response);
    }

    pub fn render(&self) -> HomePage {
        HomePage {
            loading: self.loading,
            hero: self.hero.as_ref().map(Hero::from_item),
            carousels: self
                .sections
                .iter()
                .map(|(section, items)| Carousel::new(section.title(), items))
                .collect(),
            incomplete: self.failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub loading: bool,
    pub hero: Option<Hero>,
    pub carousels: Vec<Carousel>,
    /// A section failed to load; the carousels before it are still shown.
    pub incomplete: bool,
}
