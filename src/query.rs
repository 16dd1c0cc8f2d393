use crate::builder::{build_query, BuiltQuery};
use crate::params::Params;
use crate::rebuilder::Rebuilder;
use crate::value::Value;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{mysql::MySqlQueryResult, Arguments, Executor, MySql};

/// Type alias for SQLx Query with MySQL arguments
pub type Q<'q> = Query<'q, MySql, MySqlArguments>;

/// Encodes values, in order, into MySQL bind arguments.
pub(crate) fn arguments(values: &[Value]) -> crate::Result<MySqlArguments> {
    let mut args = MySqlArguments::default();
    for value in values {
        match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(v) => args.add(*v),
            Value::Int(v) => args.add(*v),
            Value::Float(v) => args.add(*v),
            Value::Text(v) => args.add(v.clone()),
        }
        .map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

/// A MySQL statement whose placeholders may be bound to arrays.
///
/// The template may use `?` or `:name` placeholders. On construction it is
/// rebuilt against the given [`Params`] and converted to positional `?`
/// markers; each execution builds a fresh SQLx `Query` and binds the values
/// in order.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx::MySqlPool;
/// use sqlx_array_bind::{Params, PreparedQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let pool = MySqlPool::connect("mysql://localhost/test").await?;
/// let query = PreparedQuery::new(
///     "DELETE FROM users WHERE id IN (:ids)",
///     &Params::new().bind("ids", vec![1, 2, 3]),
/// )?;
///
/// let result = query.execute(&pool).await?;
/// println!("Deleted {} rows", result.rows_affected());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    sql: String,
    values: Vec<Value>,
}

impl PreparedQuery {
    /// Creates a new `PreparedQuery` using a MySQL [`Rebuilder`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`](crate::Error::MissingParameter) if a
    /// placeholder in `template` has no value in `params`.
    pub fn new<T>(template: T, params: &Params) -> crate::Result<Self>
    where
        T: AsRef<str>,
    {
        let rebuilder = Rebuilder::new("mysql")?;
        Self::with_rebuilder(&rebuilder, template, params)
    }

    /// Creates a new `PreparedQuery` with an existing [`Rebuilder`].
    pub fn with_rebuilder<T>(rebuilder: &Rebuilder, template: T, params: &Params) -> crate::Result<Self>
    where
        T: AsRef<str>,
    {
        let BuiltQuery { sql, values } = build_query(rebuilder, template.as_ref(), params)?;
        Ok(Self { sql, values })
    }

    /// The driver-ready SQL.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in binding order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Executes the query using the provided executor.
    ///
    /// Works with any SQLx `Executor`: `MySqlPool`, `Transaction`, a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn execute<'e, E>(&self, executor: E) -> crate::Result<MySqlQueryResult>
    where
        E: Executor<'e, Database = MySql>,
    {
        tracing::debug!(sql = %self.sql, binds = self.values.len(), "executing statement");

        let q: Q<'_> = sqlx::query_with(&self.sql, arguments(&self.values)?);
        Ok(q.execute(executor).await?)
    }
}
