//! The session payload and its entry attribution.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::query::QueryParams;

/// One recorded navigation to a distinct path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageviewRecord {
    pub path: String,
    /// Elapsed whole seconds since engine construction.
    pub time: u64,
}

/// How the session began. Read once from the entry navigation and never
/// refreshed; in-page route changes drop it from the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl Attribution {
    /// Build the entry attribution from the initial query string and
    /// referrer. Campaign parameters accept the `utm_` prefixed names with
    /// the bare names as fallback.
    pub fn from_entry(params: &QueryParams, referrer: &str) -> Self {
        Self {
            source: params.get("utm_source").or_else(|| params.get("source")),
            medium: params.get("utm_medium").or_else(|| params.get("medium")),
            campaign: params
                .get("utm_campaign")
                .or_else(|| params.get("campaign")),
            referrer: normalize_referrer(referrer),
        }
    }
}

/// Everything sent to the collection endpoint. One instance per document
/// lifetime, owned by the tracking engine, mutated in place, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Attribution>,
    pub pageviews: Vec<PageviewRecord>,
    /// Total elapsed seconds. Stamped only by the final beacon send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

/// Reduce a raw referrer to a stable `host/path` form: drop the scheme, one
/// leading mobile or load-balancer subdomain (`m.`, `l.`, `www2.` and the
/// like), the query string, and a single trailing slash. An empty referrer
/// yields `None`.
pub fn normalize_referrer(referrer: &str) -> Option<String> {
    if referrer.is_empty() {
        return None;
    }
    let prefix =
        Regex::new(r"(?i)^https?://((m|l|ww[w]*\d*)\.)?").expect("referrer prefix regex is valid");
    let stripped = prefix.replace(referrer, "");
    let no_query = match stripped.find('?') {
        Some(at) => &stripped[..at],
        None => stripped.as_ref(),
    };
    Some(no_query.strip_suffix('/').unwrap_or(no_query).to_string())
}
