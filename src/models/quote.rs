use serde::Serialize;
use serde_json::Value;

/// Soft error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftError {
    pub error: String,
}

/// Outcome of one upstream lookup. Serializes to the upstream payload
/// verbatim or to a `SoftError` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuoteResult {
    Quote(Value),
    Failed(SoftError),
}

impl QuoteResult {
    pub fn failed(symbol: &str, detail: impl std::fmt::Display) -> Self {
        QuoteResult::Failed(SoftError {
            error: format!("Request failed for {symbol}: {detail}"),
        })
    }
}

impl From<QuoteResult> for Value {
    fn from(r: QuoteResult) -> Self {
        match r {
            QuoteResult::Quote(v) => v,
            QuoteResult::Failed(e) => serde_json::json!({ "error": e.error }),
        }
    }
}

/// Body of a `/api/stock/` response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuoteResponse {
    Single(QuoteResult),
    // keyed by symbol, input order
    Batch(serde_json::Map<String, Value>),
}
