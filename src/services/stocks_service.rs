use futures_util::{stream, StreamExt};
use serde_json::{Map, Value};

use crate::{
    error::AppError,
    models::{QuoteResponse, QuoteResult},
    services::itick::ItickClient,
};

/// Upper bound on concurrent upstream calls within one batch.
pub const MAX_IN_FLIGHT: usize = 8;

pub const MISSING_KEY: &str = "iTick API key not configured";
pub const MISSING_PARAM: &str = "Provide 'symbol' or 'symbols' query parameter";

/// Split a `symbols` parameter: comma separated, trimmed, empties dropped.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetch one symbol. Every upstream failure comes back as data.
pub async fn fetch_one(client: &ItickClient, symbol: &str) -> QuoteResult {
    match client.quote(symbol).await {
        Ok(body) => QuoteResult::Quote(body),
        Err(e) => {
            tracing::warn!(symbol, error = %e, "upstream quote failed");
            QuoteResult::failed(symbol, e)
        }
    }
}

/// Fetch every symbol independently and key the results by symbol, in input
/// order. A repeated symbol is fetched again and the later result replaces
/// the earlier one.
pub async fn fetch_many(client: &ItickClient, symbols: &[String]) -> Map<String, Value> {
    let results: Vec<(String, QuoteResult)> = stream::iter(symbols.iter().cloned())
        .map(|sym| async move {
            let res = fetch_one(client, &sym).await;
            (sym, res)
        })
        .buffered(MAX_IN_FLIGHT)
        .collect()
        .await;

    let mut out = Map::new();
    for (sym, res) in results {
        out.insert(sym, res.into());
    }
    out
}

pub fn require_key(client: &ItickClient) -> Result<(), AppError> {
    if client.has_key() {
        Ok(())
    } else {
        Err(AppError::Configuration(MISSING_KEY.to_string()))
    }
}

/// Resolve a `/api/stock/` request.
///
/// - no api key: `Configuration`, checked before anything else
/// - `symbol` set: single lookup, body returned unwrapped
/// - `symbols` set: batch lookup keyed by symbol
/// - neither: `BadRequest`
pub async fn get_quotes(
    client: &ItickClient,
    symbol: Option<&str>,
    symbols: Option<&str>,
) -> Result<QuoteResponse, AppError> {
    require_key(client)?;

    let symbol = symbol.map(str::trim).filter(|s| !s.is_empty());
    let symbols = symbols.filter(|s| !s.is_empty());

    if let Some(sym) = symbol {
        return Ok(QuoteResponse::Single(fetch_one(client, sym).await));
    }

    if let Some(raw) = symbols {
        let list = parse_symbols(raw);
        tracing::debug!(count = list.len(), "batch quote lookup");
        return Ok(QuoteResponse::Batch(fetch_many(client, &list).await));
    }

    Err(AppError::BadRequest(MISSING_PARAM.to_string()))
}
