use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod auth_routes;
pub mod user_routes;
pub mod stocks_routes;

/// Account endpoints, relative to their mount point.
pub fn accounts(state: &AppState) -> Router<AppState> {
    let router = Router::<AppState>::new();

    let router = auth_routes::add_routes(router);
    user_routes::add_routes(router, state)
}

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = stocks_routes::add_routes(router);

    // same account endpoints under both prefixes
    let accounts = accounts(&state);

    router
        .nest("/accounts", accounts.clone())
        .nest("/api/accounts", accounts)
        .fallback(home_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
