use axum::{Router, routing::post};
use crate::{AppState, controllers::auth_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/register", post(auth_controller::post_register))
        .route("/register/", post(auth_controller::post_register))
        .route("/login", post(auth_controller::post_login))
        .route("/login/", post(auth_controller::post_login))
        .route("/token/refresh", post(auth_controller::post_refresh))
        .route("/token/refresh/", post(auth_controller::post_refresh))
}
