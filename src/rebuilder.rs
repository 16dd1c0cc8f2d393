use crate::dialect::Dialect;
use crate::error::Error;
use crate::params::{ParamKey, Params};
use crate::tokenizer::{is_dollar_quoted, Tokenizer};
use crate::value::{Param, Value};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

/// Prefix of the names generated for positional (`?`) placeholders.
const POSITIONAL_PREFIX: &str = "__";

/// A piece of a live SQL chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'s> {
    Text(&'s str),
    Positional,
    /// Name without the leading `:`.
    Named(&'s str),
}

/// The output of [`Rebuilder::rebuild`]: a statement with only named
/// placeholders, and exactly one scalar value per placeholder name.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuilt {
    /// The rewritten statement; every placeholder in it is `:name`.
    pub statement: String,
    /// Generated placeholder name (without `:`) to its value, in textual order.
    pub values: IndexMap<String, Value>,
}

impl Rebuilt {
    /// Splits into the statement and the final value map.
    pub fn into_parts(self) -> (String, IndexMap<String, Value>) {
        (self.statement, self.values)
    }
}

/// Rewrites statements so that array-bound placeholders become lists of
/// uniquely named scalar placeholders.
///
/// The rebuilder holds only compiled patterns; numbering state is created
/// fresh inside every [`rebuild`](Rebuilder::rebuild) call, so one instance
/// can be reused and shared between threads.
///
/// # Examples
///
/// ```
/// use sqlx_array_bind::{Params, Rebuilder, Value};
///
/// let rebuilder = Rebuilder::new("sqlite")?;
/// let rebuilt = rebuilder.rebuild(
///     "SELECT * FROM fruits WHERE id IN (:ids)",
///     &Params::new().bind("ids", vec![1, 3]),
/// )?;
///
/// assert_eq!(rebuilt.statement, "SELECT * FROM fruits WHERE id IN (:ids_0, :ids_1)");
/// assert_eq!(rebuilt.values["ids_1"], Value::Int(3));
/// # Ok::<(), sqlx_array_bind::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Rebuilder {
    dialect: Dialect,
    tokenizer: Tokenizer,
    opaque: Regex,
    placeholder: Regex,
}

impl Rebuilder {
    /// Creates a rebuilder for a driver name such as `"mysql"`, `"pgsql"` or `"sqlite"`.
    ///
    /// Unknown names fall back to [`Dialect::Default`].
    pub fn new(driver: &str) -> crate::Result<Self> {
        Self::with_dialect(Dialect::from_driver(driver))
    }

    /// Creates a rebuilder for an already selected [`Dialect`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if a dialect pattern fails to compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlx_array_bind::{Dialect, Rebuilder};
    ///
    /// let rebuilder = Rebuilder::with_dialect(Dialect::from_url("postgres://localhost/app"))?;
    /// assert_eq!(rebuilder.dialect(), Dialect::PgSql);
    /// # Ok::<(), sqlx_array_bind::Error>(())
    /// ```
    pub fn with_dialect(dialect: Dialect) -> crate::Result<Self> {
        Ok(Self {
            dialect,
            tokenizer: Tokenizer::new(dialect)?,
            opaque: Regex::new(dialect.opaque_pattern())?,
            placeholder: Regex::new(r":[a-zA-Z_][a-zA-Z0-9_]*|\?")?,
        })
    }

    /// The dialect selected at construction.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Rebuilds `statement` against `params`.
    ///
    /// Positional placeholders become `:__1`, `:__2`, ... numbered across the whole
    /// statement. Named placeholders keep their name on first use and get a `__k`
    /// suffix on each reuse. Array-valued bindings expand into comma-separated
    /// lists (`:ids_0, :ids_1`). Text inside literals is copied through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a placeholder has no bound value, and
    /// [`Error::PlaceholderCollision`] if a generated name is produced twice.
    pub fn rebuild(&self, statement: &str, params: &Params) -> crate::Result<Rebuilt> {
        let mut ctx = RebuildContext::new(params);
        let mut out = String::with_capacity(statement.len());

        for chunk in self.tokenizer.split(statement) {
            if self.is_opaque(chunk) {
                out.push_str(chunk);
                continue;
            }
            for segment in self.segments(chunk) {
                match segment {
                    Segment::Text(text) => out.push_str(text),
                    Segment::Positional => ctx.positional(&mut out)?,
                    Segment::Named(name) => ctx.named(name, &mut out)?,
                }
            }
        }

        tracing::debug!(
            dialect = ?self.dialect,
            placeholders = ctx.values.len(),
            "rebuilt statement"
        );

        Ok(Rebuilt {
            statement: out,
            values: ctx.values,
        })
    }

    pub(crate) fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// A chunk starting with `$` is opaque only as a complete dollar quote.
    pub(crate) fn is_opaque(&self, chunk: &str) -> bool {
        self.opaque.is_match(chunk) && (!chunk.starts_with('$') || is_dollar_quoted(chunk))
    }

    /// Splits a live chunk on `:name` and `?`.
    ///
    /// A `:name` directly after another `:` is a type cast (`::int`), not a placeholder.
    pub(crate) fn segments<'s>(&self, chunk: &'s str) -> Vec<Segment<'s>> {
        let mut segments = Vec::new();
        let mut last = 0;

        for m in self.placeholder.find_iter(chunk) {
            let token = m.as_str();
            if token.starts_with(':') && chunk[..m.start()].ends_with(':') {
                continue;
            }
            if m.start() > last {
                segments.push(Segment::Text(&chunk[last..m.start()]));
            }
            segments.push(match token.strip_prefix(':') {
                Some(name) => Segment::Named(name),
                None => Segment::Positional,
            });
            last = m.end();
        }

        if last < chunk.len() {
            segments.push(Segment::Text(&chunk[last..]));
        }
        segments
    }
}

/// Numbering state for one `rebuild` call.
struct RebuildContext<'p> {
    params: &'p Params,
    zero_based: bool,
    position: usize,
    sequence: usize,
    occurrences: HashMap<String, usize>,
    values: IndexMap<String, Value>,
}

impl<'p> RebuildContext<'p> {
    fn new(params: &'p Params) -> Self {
        Self {
            params,
            zero_based: params.is_zero_based(),
            position: 0,
            sequence: 0,
            occurrences: HashMap::new(),
            values: IndexMap::new(),
        }
    }

    fn lookup(&self, key: ParamKey) -> crate::Result<&'p Param> {
        let lookup_key = match key {
            ParamKey::Position(n) if self.zero_based => ParamKey::Position(n - 1),
            ref other => other.clone(),
        };
        self.params.get(&lookup_key).ok_or_else(|| {
            tracing::debug!(parameter = %key, "placeholder has no bound value");
            Error::MissingParameter(key)
        })
    }

    fn positional(&mut self, out: &mut String) -> crate::Result<()> {
        self.position += 1;
        let values: &[Value] = match self.lookup(ParamKey::Position(self.position))? {
            Param::List(values) => values,
            Param::Value(value) => std::slice::from_ref(value),
        };

        for (i, value) in values.iter().enumerate() {
            self.sequence += 1;
            let name = format!("{POSITIONAL_PREFIX}{}", self.sequence);
            if i > 0 {
                out.push_str(", ");
            }
            self.emit(name, value.clone(), out)?;
        }
        Ok(())
    }

    fn named(&mut self, orig: &str, out: &mut String) -> crate::Result<()> {
        let param = self.lookup(ParamKey::Name(orig.to_owned()))?;
        let name = self.occurrence_name(orig);

        match param {
            Param::Value(value) => self.emit(name, value.clone(), out),
            Param::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.emit(format!("{name}_{i}"), value.clone(), out)?;
                }
                Ok(())
            }
        }
    }

    /// `orig` on first use, then `orig__1`, `orig__2`, ...
    fn occurrence_name(&mut self, orig: &str) -> String {
        match self.occurrences.get_mut(orig) {
            None => {
                self.occurrences.insert(orig.to_owned(), 0);
                orig.to_owned()
            }
            Some(count) => {
                *count += 1;
                format!("{orig}__{count}")
            }
        }
    }

    fn emit(&mut self, name: String, value: Value, out: &mut String) -> crate::Result<()> {
        if self.values.contains_key(&name) {
            return Err(Error::PlaceholderCollision(name));
        }
        tracing::trace!(placeholder = %name, "generated placeholder");
        out.push(':');
        out.push_str(&name);
        self.values.insert(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(driver: &str, sql: &str, params: &Params) -> crate::Result<Rebuilt> {
        Rebuilder::new(driver).unwrap().rebuild(sql, params)
    }

    #[test]
    fn test_segments_skip_casts() {
        let rebuilder = Rebuilder::new("pgsql").unwrap();
        assert_eq!(
            rebuilder.segments("a::int = :a AND b = ?"),
            vec![
                Segment::Text("a::int = "),
                Segment::Named("a"),
                Segment::Text(" AND b = "),
                Segment::Positional,
            ]
        );
    }

    #[test]
    fn test_segments_ignore_numeric_colon() {
        let rebuilder = Rebuilder::new("sqlite").unwrap();
        assert_eq!(
            rebuilder.segments("x = :1"),
            vec![Segment::Text("x = :1")]
        );
    }

    #[test]
    fn test_positional_scalars() {
        let rebuilt = rebuild(
            "sqlite",
            "SELECT * FROM fruits WHERE id = ? AND name = ?",
            &Params::positional([Value::Int(6), Value::from("Apple")]),
        )
        .unwrap();
        assert_eq!(
            rebuilt.statement,
            "SELECT * FROM fruits WHERE id = :__1 AND name = :__2"
        );
        assert_eq!(rebuilt.values["__1"], Value::Int(6));
        assert_eq!(rebuilt.values["__2"], Value::Text("Apple".into()));
    }

    #[test]
    fn test_zero_based_positions_are_shifted() {
        let params: Params = [(0usize, 6), (1usize, 7)].into_iter().collect();
        let rebuilt = rebuild("sqlite", "a = ? AND b = ?", &params).unwrap();
        assert_eq!(rebuilt.statement, "a = :__1 AND b = :__2");
        assert_eq!(rebuilt.values["__1"], Value::Int(6));
        assert_eq!(rebuilt.values["__2"], Value::Int(7));
    }

    #[test]
    fn test_positional_null_yields_one_placeholder() {
        let rebuilt = rebuild("sqlite", "a = ?", &Params::new().push(Value::Null)).unwrap();
        assert_eq!(rebuilt.statement, "a = :__1");
        assert_eq!(rebuilt.values["__1"], Value::Null);
    }

    #[test]
    fn test_named_null_keeps_name() {
        let rebuilt = rebuild("sqlite", "a = :a", &Params::new().bind("a", None::<i32>)).unwrap();
        assert_eq!(rebuilt.statement, "a = :a");
        assert_eq!(rebuilt.values["a"], Value::Null);
    }

    #[test]
    fn test_named_reuse_is_suffixed() {
        let params = Params::new().bind("x", 1);
        let rebuilt = rebuild("sqlite", ":x + :x + :x", &params).unwrap();
        assert_eq!(rebuilt.statement, ":x + :x__1 + :x__2");
        assert_eq!(rebuilt.values.len(), 3);
    }

    #[test]
    fn test_named_array_reuse_is_suffixed_then_expanded() {
        let params = Params::new().bind("ids", vec![1, 2]);
        let rebuilt = rebuild("sqlite", "(:ids) OR (:ids)", &params).unwrap();
        assert_eq!(
            rebuilt.statement,
            "(:ids_0, :ids_1) OR (:ids__1_0, :ids__1_1)"
        );
        assert_eq!(
            rebuilt.values.keys().collect::<Vec<_>>(),
            vec!["ids_0", "ids_1", "ids__1_0", "ids__1_1"]
        );
    }

    #[test]
    fn test_empty_list_expands_to_nothing() {
        let params = Params::new().bind("ids", Vec::<i32>::new());
        let rebuilt = rebuild("sqlite", "id IN (:ids)", &params).unwrap();
        assert_eq!(rebuilt.statement, "id IN ()");
        assert!(rebuilt.values.is_empty());
    }

    #[test]
    fn test_literals_are_opaque() {
        let params = Params::new().bind("id", 1);
        let rebuilt = rebuild(
            "mysql",
            "SELECT ':id ?', \"?\", `:x` FROM t WHERE id = :id",
            &params,
        )
        .unwrap();
        assert_eq!(
            rebuilt.statement,
            "SELECT ':id ?', \"?\", `:x` FROM t WHERE id = :id"
        );
        assert_eq!(rebuilt.values.len(), 1);
    }

    #[test]
    fn test_pgsql_cast_after_literal() {
        let params = Params::new().bind("x", "abc");
        let rebuilt = rebuild("pgsql", "SELECT 'abc'::text = :x", &params).unwrap();
        assert_eq!(rebuilt.statement, "SELECT 'abc'::text = :x");
        assert_eq!(rebuilt.values["x"], Value::Text("abc".into()));
    }

    #[test]
    fn test_pgsql_dollar_quote_is_opaque() {
        let params = Params::new().bind("x", 1);
        let rebuilt = rebuild("pgsql", "SELECT $q$ :y ? $q$, :x", &params).unwrap();
        assert_eq!(rebuilt.statement, "SELECT $q$ :y ? $q$, :x");
    }

    #[test]
    fn test_pgsql_dollar_in_identifier_stays_live() {
        let rebuilt = rebuild(
            "pgsql",
            "SELECT price$usd$ FROM t WHERE id = ?",
            &Params::positional([1]),
        )
        .unwrap();
        assert_eq!(rebuilt.statement, "SELECT price$usd$ FROM t WHERE id = :__1");
        assert_eq!(rebuilt.values["__1"], Value::Int(1));

        let err = rebuild("pgsql", "SELECT a$b$ FROM t WHERE id = :missing", &Params::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ParamKey::Name(name)) if name == "missing"));
    }

    #[test]
    fn test_pgsql_unterminated_dollar_quote_stays_live() {
        let params = Params::new().bind("x", 1);
        let rebuilt = rebuild("pgsql", "SELECT 'a'$body$ = :x", &params).unwrap();
        assert_eq!(rebuilt.statement, "SELECT 'a'$body$ = :x");
        assert_eq!(rebuilt.values["x"], Value::Int(1));

        let err = rebuild("pgsql", "SELECT $body$ :y", &Params::new()).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ParamKey::Name(name)) if name == "y"));
    }

    #[test]
    fn test_rebuilder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rebuilder>();
    }

    #[test]
    fn test_missing_positional() {
        let err = rebuild("sqlite", "a = ? AND b = ?", &Params::positional([1])).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ParamKey::Position(2))));
    }

    #[test]
    fn test_missing_named() {
        let err = rebuild("sqlite", "a = :missing", &Params::new()).unwrap_err();
        match err {
            Error::MissingParameter(ParamKey::Name(name)) => assert_eq!(name, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_generated_name_collision() {
        let params = Params::new().bind("ids", vec![1, 2]).bind("ids_0", 9);
        let err = rebuild("sqlite", ":ids_0 OR id IN (:ids)", &params).unwrap_err();
        assert!(matches!(err, Error::PlaceholderCollision(name) if name == "ids_0"));
    }

    #[test]
    fn test_rebuilder_reuse_is_deterministic() {
        let rebuilder = Rebuilder::new("sqlite").unwrap();
        let params = Params::positional([vec![1, 2], vec![3]]);
        let first = rebuilder.rebuild("(?) AND (?)", &params).unwrap();
        let second = rebuilder.rebuild("(?) AND (?)", &params).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.statement, "(:__1, :__2) AND (:__3)");
    }
}
