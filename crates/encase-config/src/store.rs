//! Layered option store
//!
//! The `ConfigStore` holds exactly one effective value for every [`OptionKey`].
//! It is seeded from compiled-in defaults and overwritten by later resolution
//! stages; each value remembers the [`Layer`] that wrote it.

use std::collections::BTreeMap;
use std::fmt;

use crate::keys::{OptionKey, OptionKind, OptionValue, parse_flag};
use crate::{EnvSnapshot, Error, Result};

/// Resolution stage that produced a value, in increasing precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Builtin,
    File,
    Environment,
    Identity,
    Profile,
    User,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Builtin => "builtin",
            Layer::File => "file",
            Layer::Environment => "environment",
            Layer::Identity => "identity",
            Layer::Profile => "profile",
            Layer::User => "user",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: OptionValue,
    layer: Layer,
}

/// Ordered mapping from every option key to its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    entries: BTreeMap<OptionKey, Entry>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create a store with every key at its neutral value.
    pub fn new() -> Self {
        let entries = OptionKey::ALL
            .iter()
            .map(|key| {
                (
                    *key,
                    Entry {
                        value: OptionValue::neutral(key.kind()),
                        layer: Layer::Builtin,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Create a store from explicit built-in values; unspecified keys stay neutral.
    pub fn with_defaults<I>(defaults: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OptionKey, OptionValue)>,
    {
        let mut store = Self::new();
        for (key, value) in defaults {
            store.set(key, value, Layer::Builtin)?;
        }
        Ok(store)
    }

    /// Current value of `key`.
    pub fn get(&self, key: OptionKey) -> &OptionValue {
        // Every key is inserted by `new()` and never removed.
        &self.entries[&key].value
    }

    /// Layer that last wrote `key`.
    pub fn layer(&self, key: OptionKey) -> Layer {
        self.entries[&key].layer
    }

    /// True when `key` is a set flag.
    pub fn flag(&self, key: OptionKey) -> bool {
        self.get(key).is_set()
    }

    /// Non-empty scalar value of `key`.
    pub fn value(&self, key: OptionKey) -> Option<&str> {
        self.get(key).as_str()
    }

    /// Overwrite `key`. The value kind must match the key kind.
    pub fn set(&mut self, key: OptionKey, value: OptionValue, layer: Layer) -> Result<()> {
        if value.kind() != key.kind() {
            return Err(Error::InvalidOptionValue {
                key,
                expected: key.kind(),
                found: value.to_string(),
                origin: format!("{layer} layer"),
            });
        }
        self.entries.insert(key, Entry { value, layer });
        Ok(())
    }

    /// Set a scalar key.
    pub fn set_text(&mut self, key: OptionKey, value: impl Into<String>, layer: Layer) -> Result<()> {
        self.set(key, OptionValue::text(value), layer)
    }

    /// Fold `ENCASE_<KEY>` environment overrides into the store.
    ///
    /// Returns the keys that were overridden.
    pub fn apply_env(&mut self, env: &EnvSnapshot) -> Result<Vec<OptionKey>> {
        let mut applied = Vec::new();
        for key in OptionKey::ALL.iter().copied() {
            let var = key.env_var();
            let Some(raw) = env.get(&var) else {
                continue;
            };
            let value = match key.kind() {
                OptionKind::Flag => {
                    let flag = parse_flag(raw).ok_or_else(|| Error::InvalidOptionValue {
                        key,
                        expected: key.kind(),
                        found: format!("{raw:?}"),
                        origin: var.clone(),
                    })?;
                    OptionValue::Flag(flag)
                }
                OptionKind::Value => OptionValue::Value(Some(raw.to_string())),
            };
            tracing::debug!(key = key.name(), %value, "environment override");
            self.set(key, value, Layer::Environment)?;
            applied.push(key);
        }
        Ok(applied)
    }

    /// Iterate over keys and values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &OptionValue, Layer)> {
        self.entries
            .iter()
            .map(|(key, entry)| (*key, &entry.value, entry.layer))
    }
}
