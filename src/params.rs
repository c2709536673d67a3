//! Lenient request-parameter parsing shared by the handlers.
//!
//! Clients send ids as JSON numbers, numeric strings or multipart text, and
//! paging values as free-form query strings. Everything here normalises those
//! into plain integers before they reach the repositories.

use serde::{Deserialize, Deserializer};

pub const DEFAULT_LIMIT: i64 = 12;
pub const MAX_LIMIT: i64 = 50;

/// Positive integer id, or `None` for anything blank, zero, negative or non-numeric.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

/// Serde adapter for optional ids that may arrive as numbers or strings.
pub fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Int(id)) if id > 0 => Some(id),
        Some(RawId::Text(s)) => parse_id(&s),
        _ => None,
    })
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    pub fn resolve(&self) -> PageRequest {
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l != 0)
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        PageRequest {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// Trims and truncates to at most `max` characters.
pub fn clamp_text(raw: &str, max: usize) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(max) {
        Some((cut, _)) => trimmed[..cut].to_string(),
        None => trimmed.to_string(),
    }
}

/// `None` for missing or whitespace-only input.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
