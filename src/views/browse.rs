use super::paged::PagedList;
use super::{FetchResponse, ListQuery, PendingFetch};
use crate::models::{Genre, MediaKind};
use crate::pagination::{PageCursor, Pagination, COMPACT_PAGE_LINKS, GENERIC_PAGE_CEILING, PAGE_LINKS};
use crate::tmdb::TmdbApi;
use crate::widgets::{self, Card};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseTab {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    Genres,
}

const MOVIE_TABS: [BrowseTab; 5] = [
    BrowseTab::Popular,
    BrowseTab::TopRated,
    BrowseTab::NowPlaying,
    BrowseTab::Upcoming,
    BrowseTab::Genres,
];

const TV_TABS: [BrowseTab; 3] = [BrowseTab::Popular, BrowseTab::TopRated, BrowseTab::Genres];

impl BrowseTab {
    pub fn for_kind(kind: MediaKind) -> &'static [BrowseTab] {
        match kind {
            MediaKind::Movie => &MOVIE_TABS,
            MediaKind::Tv => &TV_TABS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BrowseTab::Popular => "popular",
            BrowseTab::TopRated => "top_rated",
            BrowseTab::NowPlaying => "now_playing",
            BrowseTab::Upcoming => "upcoming",
            BrowseTab::Genres => "genres",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BrowseTab::Popular => "Populaires",
            BrowseTab::TopRated => "Mieux notés",
            BrowseTab::NowPlaying => "À l'affiche",
            BrowseTab::Upcoming => "À venir",
            BrowseTab::Genres => "Par genre",
        }
    }

    fn query(self, kind: MediaKind) -> ListQuery {
        match self {
            BrowseTab::Popular => ListQuery::Popular(kind),
            BrowseTab::TopRated => ListQuery::TopRated(kind),
            BrowseTab::NowPlaying => ListQuery::NowPlaying,
            BrowseTab::Upcoming => ListQuery::Upcoming,
            BrowseTab::Genres => ListQuery::Discover {
                kind,
                genre_ids: Vec::new(),
            },
        }
    }
}

impl FromStr for BrowseTab {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "popular" => Ok(BrowseTab::Popular),
            "top_rated" => Ok(BrowseTab::TopRated),
            "now_playing" => Ok(BrowseTab::NowPlaying),
            "upcoming" => Ok(BrowseTab::Upcoming),
            "genres" => Ok(BrowseTab::Genres),
            other => Err(anyhow::anyhow!("unknown tab '{}'", other)),
        }
    }
}

/// A fetch for one tab of a browse view.
#[derive(Debug, Clone)]
pub struct TabFetch {
    pub tab: BrowseTab,
    pub fetch: PendingFetch,
}

/// Tabbed listing of movies or shows. Every tab keeps its own page and results;
/// the genres tab is driven by the selected genre set.
#[derive(Debug)]
pub struct BrowseView {
    kind: MediaKind,
    current: BrowseTab,
    lists: BTreeMap<BrowseTab, PagedList>,
    genres: Vec<Genre>,
    genres_loaded: bool,
    selected_genres: Vec<u32>,
}

impl BrowseView {
    pub fn new(kind: MediaKind) -> Self {
        let lists = BrowseTab::for_kind(kind)
            .iter()
            .map(|tab| (*tab, PagedList::new(tab.query(kind), GENERIC_PAGE_CEILING)))
            .collect();
        Self {
            kind,
            current: BrowseTab::Popular,
            lists,
            genres: Vec::new(),
            genres_loaded: false,
            selected_genres: Vec::new(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn current_tab(&self) -> BrowseTab {
        self.current
    }

    pub fn list(&self, tab: BrowseTab) -> Option<&PagedList> {
        self.lists.get(&tab)
    }

    pub fn current_list(&self) -> Option<&PagedList> {
        self.lists.get(&self.current)
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn selected_genres(&self) -> &[u32] {
        &self.selected_genres
    }

    /// True once the genres tab is shown and the genre list has not been fetched.
    pub fn needs_genres(&self) -> bool {
        self.current == BrowseTab::Genres && !self.genres_loaded
    }

    /// Shows `tab`, fetching its current page only if it has never been loaded.
    pub fn switch_tab(&mut self, tab: BrowseTab) -> Option<TabFetch> {
        if !self.lists.contains_key(&tab) {
            warn!(kind = %self.kind, tab = tab.as_str(), "Tab not offered for this media kind");
            return None;
        }
        self.current = tab;
        if tab == BrowseTab::Genres && self.selected_genres.is_empty() {
            return None;
        }
        let list = self.lists.get_mut(&tab)?;
        if list.is_loaded() || list.is_loading() {
            return None;
        }
        Some(TabFetch {
            tab,
            fetch: list.refresh(),
        })
    }

    /// Adds or removes a genre. The genres tab restarts at page 1; an empty selection
    /// clears it without a request.
    pub fn toggle_genre(&mut self, genre_id: u32) -> Option<TabFetch> {
        match self.selected_genres.iter().position(|id| *id == genre_id) {
            Some(pos) => {
                self.selected_genres.remove(pos);
            }
            None => self.selected_genres.push(genre_id),
        }
        let query = self.discover_query();
        let list = self.lists.get_mut(&BrowseTab::Genres)?;
        if self.selected_genres.is_empty() {
            list.clear();
            return None;
        }
        Some(TabFetch {
            tab: BrowseTab::Genres,
            fetch: list.reset_to(query),
        })
    }

    /// Moves the current tab to `page`; out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<TabFetch> {
        if self.current == BrowseTab::Genres && self.selected_genres.is_empty() {
            return None;
        }
        let tab = self.current;
        let fetch = self.lists.get_mut(&tab)?.go_to_page(page)?;
        Some(TabFetch { tab, fetch })
    }

    /// Restores tab, genre selection, and page from a location.
    pub fn restore(&mut self, tab: BrowseTab, page: u32, genre_ids: &[u32]) -> Option<TabFetch> {
        if !self.lists.contains_key(&tab) {
            warn!(kind = %self.kind, tab = tab.as_str(), "Tab not offered for this media kind");
            return self.switch_tab(BrowseTab::Popular);
        }
        self.selected_genres.clear();
        for id in genre_ids {
            if !self.selected_genres.contains(id) {
                self.selected_genres.push(*id);
            }
        }
        self.current = tab;
        if tab == BrowseTab::Genres && self.selected_genres.is_empty() {
            return None;
        }
        let query = if tab == BrowseTab::Genres {
            self.discover_query()
        } else {
            tab.query(self.kind)
        };
        let list = self.lists.get_mut(&tab)?;
        Some(TabFetch {
            tab,
            fetch: list.reset_at(query, page),
        })
    }

    pub fn apply(&mut self, tab: BrowseTab, response: FetchResponse) -> bool {
        self.lists
            .get_mut(&tab)
            .map(|list| list.apply(response))
            .unwrap_or(false)
    }

    pub async fn load_genres(&mut self, api: &dyn TmdbApi) {
        match api.genres(self.kind).await {
            Ok(genres) => {
                self.genres = genres;
                self.genres_loaded = true;
            }
            Err(e) => error!(kind = %self.kind, "Failed to fetch genres: {}", e),
        }
    }

    pub async fn run(&mut self, api: &dyn TmdbApi, fetch: Option<TabFetch>) {
        if self.needs_genres() {
            self.load_genres(api).await;
        }
        if let Some(TabFetch { tab, fetch }) = fetch {
            if let Some(list) = self.lists.get_mut(&tab) {
                list.load(api, fetch).await;
            }
        }
    }

    pub async fn select(&mut self, api: &dyn TmdbApi, tab: BrowseTab) {
        let fetch = self.switch_tab(tab);
        self.run(api, fetch).await;
    }

    pub async fn toggle(&mut self, api: &dyn TmdbApi, genre_id: u32) {
        let fetch = self.toggle_genre(genre_id);
        self.run(api, fetch).await;
    }

    pub async fn page(&mut self, api: &dyn TmdbApi, page: u32) {
        let fetch = self.go_to_page(page);
        self.run(api, fetch).await;
    }

    pub fn take_scroll_request(&mut self) -> bool {
        let tab = self.current;
        self.lists
            .get_mut(&tab)
            .map(PagedList::take_scroll_request)
            .unwrap_or(false)
    }

    pub fn render(&self, compact: bool) -> BrowsePage {
        let list = self.current_list();
        let cursor = list.map(PagedList::cursor).unwrap_or_default();
        let genre_tab_idle =
            self.current == BrowseTab::Genres && self.selected_genres.is_empty();
        let max_links = if compact { COMPACT_PAGE_LINKS } else { PAGE_LINKS };
        BrowsePage {
            media_type: self.kind,
            tab: self.current,
            tabs: BrowseTab::for_kind(self.kind)
                .iter()
                .map(|tab| TabLink {
                    tab: *tab,
                    label: tab.label(),
                    active: *tab == self.current,
                })
                .collect(),
            genres: self
                .genres
                .iter()
                .map(|g| GenreChip {
                    id: g.id,
                    name: g.name.clone(),
                    selected: self.selected_genres.contains(&g.id),
                })
                .collect(),
            selected_genres: self.selected_genres.clone(),
            loading: list.is_some_and(PagedList::is_loading),
            cards: list.map(|l| widgets::cards(l.results())).unwrap_or_default(),
            cursor,
            pagination: if genre_tab_idle {
                None
            } else {
                Pagination::for_cursor(&cursor, max_links)
            },
            hint: genre_tab_idle.then_some(match self.kind {
                MediaKind::Movie => {
                    "Sélectionnez un ou plusieurs genres pour voir les films correspondants"
                }
                MediaKind::Tv => {
                    "Sélectionnez un ou plusieurs genres pour voir les séries correspondantes"
                }
            }),
        }
    }

    fn discover_query(&self) -> ListQuery {
        ListQuery::Discover {
            kind: self.kind,
            genre_ids: self.selected_genres.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabLink {
    pub tab: BrowseTab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreChip {
    pub id: u32,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowsePage {
    pub media_type: MediaKind,
    pub tab: BrowseTab,
    pub tabs: Vec<TabLink>,
    pub genres: Vec<GenreChip>,
    pub selected_genres: Vec<u32>,
    pub loading: bool,
    pub cards: Vec<Card>,
    pub cursor: PageCursor,
    pub pagination: Option<Pagination>,
    pub hint: Option<&'static str>,
}
