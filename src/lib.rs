pub mod app;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod pagination;
pub mod tmdb;
pub mod views;
pub mod widgets;
