use std::convert::Infallible;
use std::fmt::Write as _;
use std::str::FromStr;

const SINGLE_QUOTED: &str = r"'(?:[^'\\]|\\'?)*'";
const DOUBLE_QUOTED: &str = r#""(?:[^"\\]|\\"?)*""#;
const BACKTICK_QUOTED: &str = r"`(?:[^`\\]|\\`?)*`";
/// Opening tag only; the tokenizer searches for the matching closing tag.
const DOLLAR_TAG: &str = r"\$(?:[A-Za-z_][A-Za-z0-9_]*)?\$";

/// Literal-quoting conventions of a database driver.
///
/// Unknown driver names select [`Dialect::Default`], which only knows
/// single- and double-quoted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Single, double and backtick quotes; `:123` is not skipped.
    MySql,
    /// Single and double quotes plus `$tag$ ... $tag$` dollar quoting.
    PgSql,
    /// Single, double and backtick quotes.
    Sqlite,
    /// Single and double quotes only.
    #[default]
    Default,
}

impl Dialect {
    /// Selects a dialect from a driver name such as `"mysql"` or `"pgsql"`.
    pub fn from_driver(driver: &str) -> Self {
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Dialect::MySql,
            "pgsql" | "postgres" | "postgresql" => Dialect::PgSql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            _ => Dialect::Default,
        }
    }

    /// Selects a dialect from a connection URL or DSN, using the part before the first `:`.
    ///
    /// ```
    /// use sqlx_array_bind::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("mysql://root@localhost/test"), Dialect::MySql);
    /// assert_eq!(Dialect::from_url("sqlite::memory:"), Dialect::Sqlite);
    /// assert_eq!(Dialect::from_url("pgsql:host=localhost;dbname=test"), Dialect::PgSql);
    /// ```
    pub fn from_url(url: &str) -> Self {
        let scheme = url.split_once(':').map_or(url, |(scheme, _)| scheme);
        Self::from_driver(scheme)
    }

    /// Regex fragments matching the string and identifier literals of this dialect.
    pub fn literal_patterns(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql | Dialect::Sqlite => &[SINGLE_QUOTED, DOUBLE_QUOTED, BACKTICK_QUOTED],
            Dialect::PgSql => &[SINGLE_QUOTED, DOUBLE_QUOTED, DOLLAR_TAG],
            Dialect::Default => &[SINGLE_QUOTED, DOUBLE_QUOTED],
        }
    }

    /// Regex testing whether a whole chunk is opaque and must be copied through.
    ///
    /// A chunk is opaque when it begins with a literal quote, or when it is a colon
    /// not followed by an identifier start (`:123`) and holds no other placeholder.
    pub fn opaque_pattern(self) -> &'static str {
        match self {
            Dialect::MySql => r#"\A['"`]"#,
            Dialect::PgSql => r#"\A(?:['"]|\$(?:[A-Za-z_][A-Za-z0-9_]*)?\$|:[^A-Za-z_:][^:?]*\z)"#,
            Dialect::Sqlite => r#"\A(?:['"`]|:[^A-Za-z_:][^:?]*\z)"#,
            Dialect::Default => r#"\A(?:['"]|:[^A-Za-z_:][^:?]*\z)"#,
        }
    }

    /// Writes the driver's positional bind marker for the 1-based `index`.
    pub fn write_bind_marker(self, index: usize, out: &mut String) {
        match self {
            Dialect::PgSql => {
                let _ = write!(out, "${index}");
            }
            Dialect::MySql | Dialect::Sqlite | Dialect::Default => out.push('?'),
        }
    }
}

impl FromStr for Dialect {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_driver(s))
    }
}
