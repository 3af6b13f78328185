//! Placeholder parameter accumulation.
//!
//! A [`ParameterMap`] is owned by one build call at a time. Condition
//! builders append to it through [`ParameterMap::bind`], which generates the
//! next free placeholder name, so the same input always produces the same
//! names.

use indexmap::IndexMap;
use polysql_core::{PolySqlError, PolySqlResult};

use crate::value::Value;

/// The default prefix for generated placeholder names.
pub const DEFAULT_PARAM_PREFIX: &str = ":qp";

/// Insertion-ordered mapping from placeholder name to bound value.
///
/// # Examples
///
/// ```
/// use polysql_db::params::ParameterMap;
/// use polysql_db::value::Value;
///
/// let mut params = ParameterMap::new();
/// assert_eq!(params.bind(Value::Int(1), ":qp"), ":qp0");
/// assert_eq!(params.bind(Value::Int(2), ":qp"), ":qp1");
/// assert_eq!(params.get(":qp1"), Some(&Value::Int(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    inner: IndexMap<String, Value>,
}

impl ParameterMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bound parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    /// Returns `true` if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Binds `value` under an explicit name, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Binds `value` under a generated name and returns that name.
    ///
    /// The name is `prefix` followed by the current parameter count; if that
    /// name is already taken (caller-supplied params), the counter moves on
    /// until a free name is found.
    pub fn bind(&mut self, value: Value, prefix: &str) -> String {
        let mut n = self.inner.len();
        let mut name = format!("{prefix}{n}");
        while self.inner.contains_key(&name) {
            n += 1;
            name = format!("{prefix}{n}");
        }
        self.inner.insert(name.clone(), value);
        name
    }

    /// Merges `other` into this map.
    ///
    /// A name bound in both maps must carry the same value in each. Nothing
    /// is merged when the check fails.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a name in `other` is already bound to a
    /// different value.
    pub fn merge(&mut self, other: &Self) -> PolySqlResult<()> {
        if let Some((name, _)) = other
            .inner
            .iter()
            .find(|(name, value)| self.inner.get(*name).is_some_and(|bound| bound != *value))
        {
            return Err(PolySqlError::InvalidArgument(format!(
                "Parameter '{name}' is already bound to a different value"
            )));
        }
        for (name, value) in &other.inner {
            self.inner.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    /// Iterates over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the map, returning `(name, value)` pairs in binding order.
    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.inner.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ParameterMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
