use std::sync::LazyLock;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use regex::Regex;

use crate::{
    error::{field_error, AppError, FieldErrors},
    models::{token, AccessToken, Claims, TokenPair, User},
    services::user_store::StoreError,
    AppState,
};

pub const REQUIRED: &str = "This field is required.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const BAD_CREDENTIALS: &str = "No active account found with the given credentials";
pub const BAD_TOKEN: &str = "Given token not valid for any token type";
pub const NO_CREDENTIALS: &str = "Authentication credentials were not provided.";

pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

fn store_error(e: StoreError) -> AppError {
    match e {
        StoreError::DuplicateUsername => {
            let mut errs = FieldErrors::new();
            field_error(&mut errs, "username", USERNAME_TAKEN);
            AppError::Validation(errs)
        }
        StoreError::Backend(msg) => AppError::Internal(msg),
    }
}

fn validate_registration(username: &str, password: &str, email: &str) -> FieldErrors {
    let mut errs = FieldErrors::new();

    if username.is_empty() {
        field_error(&mut errs, "username", REQUIRED);
    } else {
        if username.chars().count() > USERNAME_MAX {
            field_error(&mut errs, "username", "Ensure this field has no more than 150 characters.");
        }
        if !USERNAME_RE.is_match(username) {
            field_error(
                &mut errs,
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
    }

    if password.is_empty() {
        field_error(&mut errs, "password", REQUIRED);
    } else {
        if password.chars().count() < PASSWORD_MIN {
            field_error(
                &mut errs,
                "password",
                "This password is too short. It must contain at least 8 characters.",
            );
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            field_error(&mut errs, "password", "This password is entirely numeric.");
        }
    }

    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        field_error(&mut errs, "email", "Enter a valid email address.");
    }

    errs
}

/// Create a user. The stored record only ever holds the bcrypt hash.
pub async fn register(
    state: &AppState,
    username: &str,
    password: &str,
    email: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    let email = email.trim();

    let mut errs = validate_registration(username, password, email);

    if !username.is_empty() {
        match state.users.find_by_username(username).await {
            Ok(Some(_)) => field_error(&mut errs, "username", USERNAME_TAKEN),
            Ok(None) => {}
            Err(e) => return Err(store_error(e)),
        }
    }

    if !errs.is_empty() {
        return Err(AppError::Validation(errs));
    }

    let password_hash =
        hash(password, state.settings.bcrypt_cost).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User {
        id: ObjectId::new(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        date_joined: Utc::now().timestamp(),
    };

    state.users.insert(&user).await.map_err(store_error)?;

    tracing::info!(username = %user.username, "user registered");
    Ok(user)
}

pub fn make_jwt(
    state: &AppState,
    user_id: &ObjectId,
    token_type: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_hex(),
        token_type: token_type.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn issue_pair(state: &AppState, user_id: &ObjectId) -> Result<TokenPair, AppError> {
    let access = make_jwt(
        state,
        user_id,
        token::ACCESS,
        Duration::minutes(state.settings.access_token_minutes),
    )?;
    let refresh = make_jwt(
        state,
        user_id,
        token::REFRESH,
        Duration::days(state.settings.refresh_token_days),
    )?;

    Ok(TokenPair { access, refresh })
}

/// Check signature, expiry and token type.
pub fn decode_jwt(state: &AppState, token: &str, token_type: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        AppError::Authentication(BAD_TOKEN.to_string())
    })?;

    if data.claims.token_type != token_type {
        return Err(AppError::Authentication(BAD_TOKEN.to_string()));
    }

    Ok(data.claims)
}

async fn user_for_claims(state: &AppState, claims: &Claims) -> Result<User, AppError> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| AppError::Authentication(BAD_TOKEN.to_string()))?;

    state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::Authentication("User not found".to_string()))
}

pub async fn login(state: &AppState, username: &str, password: &str) -> Result<TokenPair, AppError> {
    let username = username.trim();

    let mut errs = FieldErrors::new();
    if username.is_empty() {
        field_error(&mut errs, "username", REQUIRED);
    }
    if password.is_empty() {
        field_error(&mut errs, "password", REQUIRED);
    }
    if !errs.is_empty() {
        return Err(AppError::Validation(errs));
    }

    let user = state
        .users
        .find_by_username(username)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::Authentication(BAD_CREDENTIALS.to_string()))?;

    if !verify(password, &user.password_hash).unwrap_or(false) {
        tracing::info!(username, "login rejected");
        return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
    }

    issue_pair(state, &user.id)
}

/// Trade a refresh token for a new access token.
pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<AccessToken, AppError> {
    if refresh_token.trim().is_empty() {
        let mut errs = FieldErrors::new();
        field_error(&mut errs, "refresh", REQUIRED);
        return Err(AppError::Validation(errs));
    }

    let claims = decode_jwt(state, refresh_token.trim(), token::REFRESH)?;
    let user = user_for_claims(state, &claims).await?;

    let access = make_jwt(
        state,
        &user.id,
        token::ACCESS,
        Duration::minutes(state.settings.access_token_minutes),
    )?;

    Ok(AccessToken { access })
}

/// Resolve an access token to its user.
pub async fn identity(state: &AppState, bearer: Option<&str>) -> Result<User, AppError> {
    let bearer = bearer
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Authentication(NO_CREDENTIALS.to_string()))?;

    let claims = decode_jwt(state, bearer, token::ACCESS)?;
    user_for_claims(state, &claims).await
}
