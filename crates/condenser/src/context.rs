//! Evaluation context threaded through all entries of one evaluation
//!
//! A [Context] is never mutated in place. [Context::with] returns a new context and leaves the
//! original (and every clone of it) untouched, so an entry can only influence the entries after it.
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Context key holding the caller supplied `NAME=VALUE` parameters
pub const PARAMS_KEY: &str = "params";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: Arc<IndexMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying `params` under [PARAMS_KEY]
    pub fn with_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let params: Value = params
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect::<IndexMap<String, String>>()
            .into();

        Self::new().with(PARAMS_KEY, params)
    }

    /// Derive a new context with `key` set to `value`
    ///
    /// An existing entry for `key` is replaced in the returned context only.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).insert(key.into(), value.into());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a single caller supplied parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.get(PARAMS_KEY)
            .and_then(Value::as_object)
            .and_then(|params| params.get(name))
            .and_then(Value::as_str)
    }

    /// All caller supplied parameters that are strings
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.get(PARAMS_KEY)
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(name, value)| value.as_str().map(|value| (name.as_str(), value)))
    }
}
