//! Presentation shapes for already-fetched data. Nothing here talks to the network.

use crate::images::{self, BackdropSize, PosterSize};
use crate::models::{MediaKind, WorkItem};
use serde::Serialize;

pub fn detail_link(kind: MediaKind, id: u64) -> String {
    format!("/{kind}/{id}")
}

/// One decimal, hidden for unrated works.
pub fn rating_label(vote_average: f64) -> Option<String> {
    (vote_average > 0.0).then(|| format!("{vote_average:.1}"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub poster_url: String,
    pub link: String,
}

impl Card {
    pub fn from_item(item: &WorkItem) -> Self {
        Self {
            id: item.id(),
            media_type: item.kind(),
            title: item.title().to_string(),
            year: item.year(),
            rating: rating_label(item.vote_average()),
            poster_url: images::poster_url(item.poster_path(), PosterSize::Medium),
            link: detail_link(item.kind(), item.id()),
        }
    }
}

pub fn cards(items: &[WorkItem]) -> Vec<Card> {
    items.iter().map(Card::from_item).collect()
}

/// Horizontally scrolling row of cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carousel {
    pub title: String,
    pub cards: Vec<Card>,
}

impl Carousel {
    pub fn new(title: impl Into<String>, items: &[WorkItem]) -> Self {
        Self {
            title: title.into(),
            cards: cards(items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    #[serde(flatten)]
    pub card: Card,
    pub overview: String,
    pub backdrop_url: Option<String>,
}

impl Hero {
    pub fn from_item(item: &WorkItem) -> Self {
        Self {
            card: Card::from_item(item),
            overview: item.overview().to_string(),
            backdrop_url: images::backdrop_url(item.backdrop_path(), BackdropSize::Original),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_LINKS: [NavLink; 4] = [
    NavLink { label: "Accueil", href: "/" },
    NavLink { label: "Films", href: "/movies" },
    NavLink { label: "Séries", href: "/tv" },
    NavLink { label: "Tendances", href: "/trending" },
];

const FOOTER_GENRES: [NavLink; 5] = [
    NavLink { label: "Action", href: "/movies?tab=genres&genres=28" },
    NavLink { label: "Comédie", href: "/movies?tab=genres&genres=35" },
    NavLink { label: "Drame", href: "/movies?tab=genres&genres=18" },
    NavLink { label: "Horreur", href: "/movies?tab=genres&genres=27" },
    NavLink { label: "Science-Fiction", href: "/tv?tab=genres&genres=10765" },
];

const ATTRIBUTION: &str = "Les données sont fournies par TMDb (https://www.themoviedb.org).";

/// Where the navigation search box sends a query; blank input goes nowhere.
pub fn search_location(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("/search?q={}", urlencoding::encode(trimmed)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub navigation: Vec<NavLink>,
    pub genres: Vec<NavLink>,
    pub attribution: &'static str,
}

impl Default for Footer {
    fn default() -> Self {
        let mut navigation = NAV_LINKS.to_vec();
        navigation.push(NavLink {
            label: "Recherche",
            href: "/search",
        });
        Self {
            navigation,
            genres: FOOTER_GENRES.to_vec(),
            attribution: ATTRIBUTION,
        }
    }
}

/// Navigation bar and footer around a view body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen<T> {
    pub nav: Vec<NavLink>,
    pub body: T,
    pub footer: Footer,
}

impl<T> Screen<T> {
    pub fn new(body: T) -> Self {
        Self {
            nav: NAV_LINKS.to_vec(),
            body,
            footer: Footer::default(),
        }
    }
}

/// Terminal state for unknown routes and unresolvable detail pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFoundPage {
    pub status: u16,
    pub title: &'static str,
    pub message: &'static str,
    pub home_link: &'static str,
}

impl NotFoundPage {
    pub fn route() -> Self {
        Self {
            status: 404,
            title: "Page non trouvée",
            message: "La page que vous recherchez n'existe pas ou a été déplacée.",
            home_link: "/",
        }
    }

    pub fn for_kind(kind: MediaKind) -> Self {
        let (title, message) = match kind {
            MediaKind::Movie => (
                "Film non trouvé",
                "Désolé, nous n'avons pas pu trouver le film que vous cherchez.",
            ),
            MediaKind::Tv => (
                "Série non trouvée",
                "Désolé, nous n'avons pas pu trouver la série que vous cherchez.",
            ),
        };
        Self {
            status: 404,
            title,
            message,
            home_link: "/",
        }
    }
}
