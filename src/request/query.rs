//! Filter encodings for the two API dialects

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Keys lifted out of the filter into the top-level query object, in output order
pub const RESERVED_KEYS: [&str; 7] = [
    "limit", "offset", "flat", "sort", "report", "expand", "history",
];

/// Marks `encodeURIComponent` leaves alone but `urlencoding` escapes
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a string the way browsers encode a URI component
pub fn encode_uri_component(input: &str) -> String {
    UNRESERVED_MARKS
        .iter()
        .fold(urlencoding::encode(input).into_owned(), |encoded, (escape, mark)| {
            encoded.replace(escape, mark)
        })
}

// ============================================================================
// Standard Dialect
// ============================================================================

/// Build the `{filter, limit, offset, ...}` query object
///
/// Params that already carry a `filter` key are used as they are.
/// Otherwise the params become the filter and reserved keys are hoisted
/// next to it.
pub fn standard_query(params: &JsonObject) -> JsonObject {
    if params.contains_key("filter") {
        return params.clone();
    }

    let mut filter = params.clone();
    let hoisted: Vec<(&str, JsonValue)> = RESERVED_KEYS
        .iter()
        .filter_map(|key| filter.shift_remove(*key).map(|value| (*key, value)))
        .collect();

    let mut query = JsonObject::new();
    query.insert("filter".to_string(), JsonValue::Object(filter));
    for (key, value) in hoisted {
        query.insert(key.to_string(), value);
    }
    query
}

/// `query=<url-encoded JSON>` for a standard dialect read
pub fn standard_query_string(query: &JsonObject) -> Result<String> {
    let json = serde_json::to_string(query)?;
    Ok(format!("query={}", encode_uri_component(&json)))
}

// ============================================================================
// App Dialect
// ============================================================================

/// Comparison operators the app dialect understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
}

impl Operator {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Gt | Self::Gte => ">=",
            Self::Lt | Self::Lte => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

/// One `field{op}value` term per param, joined with `&`, in caller order
///
/// The app API has no strict inequalities, so `gt` and `lt` are rewritten
/// as `>= v+1` and `<= v-1`. Only the first operator of a field is used.
pub fn app_query_string(params: &JsonObject) -> Result<String> {
    let mut terms = Vec::with_capacity(params.len());

    for (field, value) in params {
        let key = encode_uri_component(field);
        let term = match value {
            JsonValue::Object(ops) => {
                match ops
                    .iter()
                    .find_map(|(op, operand)| Operator::parse(op).map(|op| (op, operand)))
                {
                    Some((op, operand)) => {
                        let operand = match op {
                            Operator::Gt => shift_number(field, operand, 1)?,
                            Operator::Lt => shift_number(field, operand, -1)?,
                            _ => render_value(operand),
                        };
                        format!("{key}{}{}", op.symbol(), encode_uri_component(&operand))
                    }
                    None => format!("{key}={}", encode_uri_component(&value.to_string())),
                }
            }
            other => format!("{key}={}", encode_uri_component(&render_value(other))),
        };
        terms.push(term);
    }

    Ok(terms.join("&"))
}

/// Plain-text rendering of a query value
fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Add `delta` to a numeric operand
///
/// Integers are shifted exactly and must stay within the range a JSON
/// integer can carry (`i64::MIN..=u64::MAX`).
fn shift_number(field: &str, operand: &JsonValue, delta: i64) -> Result<String> {
    let integer = match operand {
        JsonValue::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        JsonValue::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    if let Some(n) = integer {
        return n
            .checked_add(i128::from(delta))
            .filter(|shifted| (i128::from(i64::MIN)..=i128::from(u64::MAX)).contains(shifted))
            .map(|shifted| shifted.to_string())
            .ok_or_else(|| {
                Error::invalid_arguments(
                    "get",
                    format!("strict comparison on '{field}' is out of range: {operand}"),
                )
            });
    }

    let float = match operand {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    if let Some(n) = float.filter(|n| n.is_finite()) {
        return Ok((n + delta as f64).to_string());
    }

    Err(Error::invalid_arguments(
        "get",
        format!("strict comparison on '{field}' needs a numeric value, got {operand}"),
    ))
}
