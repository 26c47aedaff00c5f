//! Run one catalog view against the live TMDB API and print its view model as JSON.
//! Usage:
//!   cargo run --bin catalog_probe -- detail <movie|tv> <tmdb_id>
//!   cargo run --bin catalog_probe -- search <query> [all|movie|tv] [page]
//!   cargo run --bin catalog_probe -- browse <movie|tv> <tab> [page] [genre_ids]
//!   cargo run --bin catalog_probe -- trending [all|movie|tv] [day|week] [page]
//!   cargo run --bin catalog_probe -- upcoming [page]
//!   cargo run --bin catalog_probe -- home
//! Requires TMDB_API_KEY and TMDB_ACCESS_TOKEN in the environment (.env supported).

use anyhow::{Context, Result};
use cinescope::config::Config;
use cinescope::models::MediaKind;
use cinescope::tmdb::{TimeWindow, TmdbClient, TrendingScope};
use cinescope::views::browse::{BrowseTab, BrowseView};
use cinescope::views::detail::DetailView;
use cinescope::views::home::HomeView;
use cinescope::views::search::{MediaFilter, SearchParams, SearchView};
use cinescope::views::trending::TrendingView;
use cinescope::views::upcoming::UpcomingView;
use dotenvy::dotenv;
use serde::Serialize;
use std::env;
use std::str::FromStr;

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin catalog_probe -- detail <movie|tv> <tmdb_id>");
    eprintln!("       cargo run --bin catalog_probe -- search <query> [all|movie|tv] [page]");
    eprintln!("       cargo run --bin catalog_probe -- browse <movie|tv> <tab> [page] [genre_ids]");
    eprintln!("       cargo run --bin catalog_probe -- trending [all|movie|tv] [day|week] [page]");
    eprintln!("       cargo run --bin catalog_probe -- upcoming [page]");
    eprintln!("       cargo run --bin catalog_probe -- home");
    std::process::exit(1);
}

fn page_arg(args: &[String], idx: usize) -> Result<u32> {
    match args.get(idx) {
        Some(raw) => raw.parse().context("page must be a positive integer"),
        None => Ok(1),
    }
}

fn print<T: Serialize>(model: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(model)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1) else { usage() };

    let client = TmdbClient::new(Config::from_env()?);

    match command.as_str() {
        "detail" => {
            if args.len() < 4 {
                usage();
            }
            let kind = MediaKind::from_str(&args[2])?;
            let mut view = DetailView::new(kind);
            view.load(&client, Some(&args[3])).await;
            print(view.state())?;
        }
        "search" => {
            let query = args.get(2).cloned().unwrap_or_else(|| usage());
            let params = SearchParams {
                query,
                filter: args
                    .get(3)
                    .map(|f| MediaFilter::parse_lenient(f))
                    .unwrap_or_default(),
                page: page_arg(&args, 4)?,
            };
            let mut view = SearchView::new();
            let fetch = view.mount(params);
            view.run(&client, fetch).await;
            print(&view.render())?;
        }
        "browse" => {
            if args.len() < 4 {
                usage();
            }
            let kind = MediaKind::from_str(&args[2])?;
            let tab = BrowseTab::from_str(&args[3])?;
            let genre_ids: Vec<u32> = match args.get(5) {
                Some(raw) => raw
                    .split(',')
                    .map(|id| id.trim().parse().context("genre ids must be integers"))
                    .collect::<Result<_>>()?,
                None => Vec::new(),
            };
            let mut view = BrowseView::new(kind);
            let fetch = view.restore(tab, page_arg(&args, 4)?, &genre_ids);
            view.run(&client, fetch).await;
            print(&view.render(false))?;
        }
        "trending" => {
            let scope = match args.get(2) {
                Some(raw) => TrendingScope::from_str(raw)?,
                None => TrendingScope::All,
            };
            let window = match args.get(3) {
                Some(raw) => TimeWindow::from_str(raw)?,
                None => TimeWindow::Day,
            };
            let mut view = TrendingView::new();
            let fetch = view.restore(scope, window, page_arg(&args, 4)?);
            view.run(&client, Some(fetch)).await;
            print(&view.render())?;
        }
        "upcoming" => {
            let mut view = UpcomingView::default();
            view.load(&client, page_arg(&args, 2)?).await;
            print(&view.render())?;
        }
        "home" => {
            let mut view = HomeView::default();
            view.load(&client).await;
            print(&view.render())?;
        }
        _ => usage(),
    }

    Ok(())
}
