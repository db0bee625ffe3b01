use axum::{extract::Extension, response::IntoResponse, Json};

use crate::models::CurrentUser;

/// `require_user` runs first, so the extension is always there.
pub async fn me(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(user)
}
