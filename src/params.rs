use crate::value::Param;
use indexmap::IndexMap;
use std::fmt;

/// Key of a bound value: a 1-based position for `?`, or a name for `:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Position(usize),
    /// Stored without the leading `:`.
    Name(String),
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Position(n) => write!(f, "{n}"),
            ParamKey::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<usize> for ParamKey {
    fn from(n: usize) -> Self {
        ParamKey::Position(n)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(strip_sigil(name).to_owned())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        match name.strip_prefix(':') {
            Some(stripped) => ParamKey::Name(stripped.to_owned()),
            None => ParamKey::Name(name),
        }
    }
}

fn strip_sigil(name: &str) -> &str {
    name.strip_prefix(':').unwrap_or(name)
}

/// Caller-supplied values, in insertion order.
///
/// # Examples
///
/// ```
/// use sqlx_array_bind::Params;
///
/// let named = Params::new()
///     .bind("ids", vec![1, 3, 5])
///     .bind(":name", "Apple");
/// assert_eq!(named.len(), 2);
///
/// let positional = Params::positional([6, 200]);
/// assert!(!positional.has_list());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: IndexMap<ParamKey, Param>,
}

impl Params {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a positional map keyed `1..=n` in iteration order.
    pub fn positional<I, P>(values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        values.into_iter().fold(Self::new(), Self::push)
    }

    /// Binds a named value. A leading `:` on `name` is ignored.
    pub fn bind<N, P>(mut self, name: N, value: P) -> Self
    where
        N: Into<String>,
        P: Into<Param>,
    {
        self.entries
            .insert(ParamKey::from(name.into()), value.into());
        self
    }

    /// Binds the next positional value, after the highest position bound so far.
    pub fn push<P: Into<Param>>(mut self, value: P) -> Self {
        let next = self
            .entries
            .keys()
            .filter_map(|k| match k {
                ParamKey::Position(n) => Some(n + 1),
                ParamKey::Name(_) => None,
            })
            .max()
            .unwrap_or(1);
        self.entries.insert(ParamKey::Position(next), value.into());
        self
    }

    /// Inserts a value under an explicit key, returning the previous value.
    pub fn insert<K, P>(&mut self, key: K, value: P) -> Option<Param>
    where
        K: Into<ParamKey>,
        P: Into<Param>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up a value by its exact key; zero-based positions are not shifted here.
    pub fn get(&self, key: &ParamKey) -> Option<&Param> {
        self.entries.get(key)
    }

    /// Returns `true` if any bound value is array-valued.
    pub fn has_list(&self) -> bool {
        self.entries.values().any(Param::is_list)
    }

    /// Positional keys start at 0 instead of 1.
    pub(crate) fn is_zero_based(&self) -> bool {
        self.entries.contains_key(&ParamKey::Position(0))
    }

    /// Number of bound keys; an array counts once.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &Param)> {
        self.entries.iter()
    }
}

impl<K, P> FromIterator<(K, P)> for Params
where
    K: Into<ParamKey>,
    P: Into<Param>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
