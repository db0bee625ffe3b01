use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{error::AppError, models::CurrentUser, services::auth_service, AppState};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(b)| b)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// ---------------- REGISTER ----------------

#[derive(Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

pub async fn post_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let form = body(payload)?;

    let user = auth_service::register(
        &state,
        &form.username,
        &form.password,
        form.email.as_deref().unwrap_or(""),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CurrentUser::from(user))).into_response())
}

// ---------------- LOGIN ----------------

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn post_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let form = body(payload)?;

    let pair = auth_service::login(&state, &form.username, &form.password).await?;

    Ok((StatusCode::OK, Json(pair)).into_response())
}

// ---------------- REFRESH ----------------

#[derive(Deserialize)]
pub struct RefreshBody {
    #[serde(default)]
    pub refresh: String,
}

pub async fn post_refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let form = body(payload)?;

    let access = auth_service::refresh(&state, &form.refresh).await?;

    Ok((StatusCode::OK, Json(access)).into_response())
}
