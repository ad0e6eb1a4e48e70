use serde::Serialize;
use serde_json::{Map, Value};

/// One search result, in the order the server ranked it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Hit {
    pub title: String,
    pub url: String,
    pub score: f64,
    pub keywords: Vec<String>,
}

/// One completed remote answer.
///
/// `total_hits == 0` is the only emptiness signal; `results.len()` may be
/// smaller than `total_hits` when the server caps returned hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<Hit>,
    pub query_time: f64,
    pub total_hits: u64,
}

impl SearchResponse {
    /// Canonical empty response, shared by zero-hit answers and malformed payloads.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            query_time: 0.0,
            total_hits: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_hits == 0
    }
}

impl Default for SearchResponse {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reshape a loosely typed `{ query_time, results, total_hits }` payload.
///
/// Lenient: any payload failing validation becomes [`SearchResponse::empty`]
/// instead of an error. `query_time`, `results` and `total_hits` must all be
/// truthy, `results` must be an array, `query_time` a number and `total_hits`
/// a non-negative integer. Individual hits are not validated: missing or
/// mistyped hit fields fall back to empty values and the hit is kept.
pub fn normalize_response(payload: &Value) -> SearchResponse {
    let Some(body) = payload.as_object() else {
        return SearchResponse::empty();
    };
    match validated_fields(body) {
        Some((query_time, results, total_hits)) => SearchResponse {
            results: results.iter().map(normalize_hit).collect(),
            query_time,
            total_hits,
        },
        None => SearchResponse::empty(),
    }
}

fn validated_fields(body: &Map<String, Value>) -> Option<(f64, &Vec<Value>, u64)> {
    let query_time = body.get("query_time").filter(|v| is_truthy(v))?;
    let results = body.get("results").filter(|v| is_truthy(v))?;
    let total_hits = body.get("total_hits").filter(|v| is_truthy(v))?;

    let results = results.as_array()?;
    let query_time = query_time.as_f64()?;
    let total_hits = as_count(total_hits)?;
    Some((query_time, results, total_hits))
}

fn normalize_hit(raw: &Value) -> Hit {
    Hit {
        title: string_field(raw, "title"),
        url: string_field(raw, "url"),
        score: raw.get("score").and_then(Value::as_f64).unwrap_or_default(),
        keywords: raw
            .get("keywords")
            .and_then(Value::as_array)
            .map(|keywords| {
                keywords
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}

/// Truthiness as the search API's JSON consumers see it: `null`, `false`,
/// `0` and `""` are falsy, every array and object is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
