use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{error::AppError, services::stocks_service, AppState};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct StockQuery {
    pub symbol: Option<String>,
    pub symbols: Option<String>,
}

impl StockQuery {
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = StockQuery::default();
        for (k, v) in pairs {
            match k.as_str() {
                "symbol" => q.symbol = Some(v),
                "symbols" => q.symbols = Some(v),
                _ => {}
            }
        }
        q
    }
}

/// `GET /api/stock/?symbol=X` or `?symbols=X,Y,Z`.
///
/// Upstream failures come back as 200 with soft errors in the body; only a
/// missing parameter (400) or a missing api key (500) fail the request.
pub async fn get_stock(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = match query {
        Ok(Query(pairs)) => StockQuery::from_pairs(pairs),
        Err(e) => {
            // a missing key still answers 500 for any query
            stocks_service::require_key(&state.itick)?;
            return Err(AppError::BadRequest(e.body_text()));
        }
    };

    let data = stocks_service::get_quotes(
        &state.itick,
        query.symbol.as_deref(),
        query.symbols.as_deref(),
    )
    .await?;

    Ok((StatusCode::OK, Json(data)).into_response())
}
