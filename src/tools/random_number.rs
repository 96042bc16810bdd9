use rand::Rng;
use serde_json::{json, Value};

use super::{Arguments, Tool, ToolError};

pub const TOOL_NAME: &str = "get-random-number";

/// Upper bound used when `max` is absent, unparsable, or not positive.
pub const DEFAULT_MAX: i64 = 100;

/// Build the `get-random-number` tool: a uniform integer in `1..=max`.
pub fn tool() -> Tool {
    Tool::new(
        TOOL_NAME,
        "Generate a random number between 1 and the specified maximum value",
        json!({
            "type": "object",
            "properties": {
                "max": {
                    "type": "integer",
                    "description": "Maximum value for the random number (defaults to 100 if not specified)"
                }
            }
        }),
        handle,
    )
}

fn handle(args: &Arguments) -> Result<i64, ToolError> {
    let max = resolve_max(args.get("max"));
    Ok(rand::thread_rng().gen_range(1..=max))
}

/// Coerce the `max` argument to a positive bound.
///
/// Integers are taken as-is, floats are truncated and strings are read for a
/// leading integer. Anything else, or a result below 1, falls back to
/// [`DEFAULT_MAX`].
pub fn resolve_max(raw: Option<&Value>) -> i64 {
    let parsed = match raw {
        // `as` saturates, so floats beyond the i64 range clamp to its bounds.
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(max) if max > 0 => max,
        _ => DEFAULT_MAX,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(|c: char| c == '+' || c == '-'));
    let digits = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |end| end + sign_len);
    s[..digits].parse().ok()
}
