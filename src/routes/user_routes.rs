use axum::{Router, middleware::from_fn_with_state, routing::get};
use crate::{AppState, auth, controllers::user_controller};

pub fn add_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(user_controller::me))
        .route("/user/", get(user_controller::me))
        .route_layer(from_fn_with_state(state.clone(), auth::require_user));

    router.merge(protected)
}
