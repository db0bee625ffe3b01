use axum::{Router, routing::get};
use crate::{AppState, controllers::stocks_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/stock/", get(stocks_controller::get_stock))
        .route("/api/stock", get(stocks_controller::get_stock))
}
