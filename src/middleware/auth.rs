use axum::{
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{models::CurrentUser, services::auth_service, AppState};

/// Token from an `Authorization: Bearer <token>` header, if any.
pub fn get_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut it = raw.trim().splitn(2, ' ');
    let scheme = it.next()?;
    let token = it.next()?.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

/// Gate for protected routes: resolves the bearer token and stores the
/// `CurrentUser` in request extensions, or answers 401.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = get_bearer(req.headers());

    match auth_service::identity(&state, token.as_deref()).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser::from(user));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
