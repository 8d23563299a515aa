// ABOUTME: Library crate for mailserver-aliases exposing public API for testing and external use

pub mod app;
pub mod config;
pub mod docker;
pub mod models;
