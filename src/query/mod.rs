//! Normalization of raw browse request parameters into a [`UniqueQuery`]

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::models::UniqueQuery;

/// A request parameter as it arrived: once, or repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    Multi(Vec<String>),
}

impl RawValue {
    /// The value that counts: the only one, or the first of a repeated key.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Multi(values) => values.first().map(String::as_str),
        }
    }
}

/// Raw request parameters keyed by name. A missing key is an absent parameter.
#[derive(Debug, Clone, Default)]
pub struct RawParams(HashMap<String, RawValue>);

impl RawParams {
    /// Collects decoded `key=value` pairs, keeping repeated keys in arrival order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = HashMap::new();

        for (key, value) in pairs {
            let value = value.into();
            match params.entry(key.into()) {
                Entry::Vacant(slot) => {
                    slot.insert(RawValue::Single(value));
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    match existing {
                        RawValue::Multi(values) => values.push(value),
                        RawValue::Single(first) => {
                            let first = std::mem::take(first);
                            *existing = RawValue::Multi(vec![first, value]);
                        }
                    }
                }
            }
        }

        Self(params)
    }

    /// First non-empty value for `key`, if any.
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(RawValue::first)
            .filter(|value| !value.is_empty())
    }
}

/// Builds the canonical query. Total: every field falls back to its default
/// when the parameter is absent, empty, or an empty sequence.
///
/// `page` is not checked for being numeric.
pub fn normalize(raw: &RawParams) -> UniqueQuery {
    let defaults = UniqueQuery::default();

    let pick = |key: &str, default: String| {
        raw.get(key).map_or(default, ToString::to_string)
    };

    UniqueQuery {
        page: pick("page", defaults.page),
        search: pick("search", defaults.search),
        ordering: pick("ordering", defaults.ordering),
        league: pick("league", defaults.league),
    }
}
