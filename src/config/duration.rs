//! Serde helper for duration strings like "500ms", "30s", "5m", "1h".

use serde::{Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse_duration(&s).map_err(serde::de::Error::custom),
        None => Ok(Duration::ZERO),
    }
}

pub(crate) fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Duration::ZERO);
    }

    // "ms" must be tried before "m". Bare numbers count as seconds.
    let (number, scale) = if let Some(v) = input.strip_suffix("ms") {
        (v, 1e-3)
    } else if let Some(v) = input.strip_suffix('h') {
        (v, 3600.0)
    } else if let Some(v) = input.strip_suffix('m') {
        (v, 60.0)
    } else if let Some(v) = input.strip_suffix('s') {
        (v, 1.0)
    } else {
        (input, 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("not a duration: {}", input))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("duration must be non-negative: {}", input));
    }

    Ok(Duration::from_secs_f64(value * scale))
}
