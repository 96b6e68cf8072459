//! Data models for the uniques catalog API and the canonical browse query

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical browse query after normalization of the raw request parameters.
///
/// Every field is a plain scalar. `page` is kept as the caller sent it and is
/// forwarded to the API untouched; see [`UniqueQuery::page_number`] for the
/// display-side conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueQuery {
    pub page: String,
    pub search: String,
    pub ordering: String,
    /// Empty means the API's current league.
    pub league: String,
}

impl UniqueQuery {
    pub const DEFAULT_PAGE: &'static str = "1";
    pub const DEFAULT_ORDERING: &'static str = "name";

    /// Page as a number for the pagination controls, `None` if it is not one.
    pub fn page_number(&self) -> Option<u32> {
        self.page.trim().parse().ok()
    }
}

impl Default for UniqueQuery {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE.to_string(),
            search: String::new(),
            ordering: Self::DEFAULT_ORDERING.to_string(),
            league: String::new(),
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of items matching the query across all pages.
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Base item template a unique is built on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub item_class: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Drop statistics for uniques obtainable through ancient orb rerolls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AncientMeta {
    #[serde(default)]
    pub tier: Option<i64>,
    /// Probability in (0, 1].
    #[serde(default, deserialize_with = "number_or_string")]
    pub chance: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub avg_orbs: Option<f64>,
    #[serde(default)]
    pub min_ilvl: Option<i64>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl AncientMeta {
    /// True when at least one displayable statistic is present.
    pub fn has_stats(&self) -> bool {
        self.tier.is_some()
            || self.chance.is_some()
            || self.avg_orbs.is_some()
            || self.min_ilvl.is_some()
    }
}

/// A unique item as listed by `/api/uniques/`.
///
/// Prices and listing counts are per league and may be missing entirely;
/// they stay `None` rather than being read as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub required_level: Option<i64>,
    #[serde(default)]
    pub image_url: String,
    pub base_item: BaseItem,
    #[serde(default)]
    pub flavour_text: String,
    #[serde(default, deserialize_with = "decimal_text")]
    pub chaos_value: Option<String>,
    #[serde(default, deserialize_with = "decimal_text")]
    pub divine_value: Option<String>,
    #[serde(default)]
    pub listing_count: Option<i64>,
    #[serde(default)]
    pub ancient_meta: Option<AncientMeta>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Decimal fields arrive as strings from the API but plain numbers are
/// accepted too. Unparsable text is treated as missing.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrString>::deserialize(deserializer)?.and_then(|value| match value {
            NumberOrString::Number(n) => Some(n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }),
    )
}

/// Keeps decimal prices as their textual form, stringifying bare numbers.
fn decimal_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrString>::deserialize(deserializer)?.map(|value| match value {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::Text(s) => s,
        }),
    )
}
