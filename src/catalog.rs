use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::warn;

use crate::error::ConfigError;

/// Storefront product key → ASIN. Order here is the order of the snapshot.
const BUILTIN: &[(&str, &str)] = &[
    ("espresso-machine-dual-boiler", "B0BT8QW6XK"),
    ("espresso-grinder-flat-burr", "B09V7Z5R6M"),
    ("hand-grinder-travel", "B08KSQ4N1P"),
    ("milk-jug-600ml", "B07QXMZ7C4"),
    ("tamper-58mm-calibrated", "B0C1J9D2QH"),
    ("scale-brew-timer", "B0B5YQ1T3S"),
    ("kettle-gooseneck-temp", "B08DKZL2R7"),
    ("pour-over-dripper-ceramic", "B00LGEKOMS"),
    ("paper-filters-02-100", "B000I1UTFS"),
    ("knock-box-stainless", "B07H8QMW3V"),
    ("descaler-espresso-2x", "B01N0ZBG95"),
    ("cleaning-tablets-100", "B001ECQ3L8"),
];

/// Immutable ordered mapping of storefront product keys to provider item ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    /// The compiled-in product table.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_pairs(BUILTIN.iter().copied())
    }

    /// Build a catalog, rejecting blank keys or ids. A repeated key keeps its
    /// first position and last id.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries = IndexMap::new();
        for (key, asin) in pairs {
            let key = key.trim();
            let asin = asin.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidCatalog {
                    key: key.to_string(),
                    reason: "blank product key",
                });
            }
            if asin.is_empty() {
                return Err(ConfigError::InvalidCatalog {
                    key: key.to_string(),
                    reason: "blank item id",
                });
            }
            if let Some(previous) = entries.insert(key.to_string(), asin.to_string()) {
                warn!(key, previous = %previous, asin, "catalog: duplicate product key");
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct item ids in catalog order.
    pub fn unique_ids(&self) -> Vec<String> {
        self.entries.values().unique().cloned().collect()
    }

    /// Item id → owning product keys, in catalog order.
    pub fn reverse_index(&self) -> HashMap<&str, Vec<&str>> {
        let mut index: HashMap<&str, Vec<&str>> = HashMap::with_capacity(self.entries.len());
        for (key, asin) in self.iter() {
            index.entry(asin).or_default().push(key);
        }
        index
    }
}
