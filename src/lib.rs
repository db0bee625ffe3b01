//! Library entrypoint for StockPortal.
//!
//! Kept separate from `main.rs` so integration tests under `tests/` can build
//! the app state and routers directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{itick::ItickClient, user_store::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub users: Arc<dyn UserStore>,
    pub itick: ItickClient,
}

impl AppState {
    pub fn new(settings: config::Settings, users: Arc<dyn UserStore>) -> Self {
        let itick = ItickClient::new(
            settings.itick_api_key.clone(),
            settings.itick_base_url.clone(),
            settings.upstream_timeout,
        );

        Self {
            settings,
            users,
            itick,
        }
    }
}
