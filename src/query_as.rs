use crate::builder::{build_query, BuiltQuery};
use crate::params::Params;
use crate::query::arguments;
use crate::rebuilder::Rebuilder;
use crate::value::Value;
use sqlx::{
    mysql::{MySqlArguments, MySqlRow},
    query::QueryAs,
    Executor, MySql,
};

/// Type alias for SQLx QueryAs with MySQL arguments
pub type QA<'q, R> = QueryAs<'q, MySql, R, MySqlArguments>;

/// A MySQL query returning typed rows, with array-aware placeholders.
///
/// Like [`PreparedQuery`](crate::PreparedQuery), but rows are decoded through
/// SQLx's `FromRow`. Supports `fetch_all`, `fetch_one` and `fetch_optional`.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx::{MySqlPool, FromRow};
/// use sqlx_array_bind::{Params, PreparedQueryAs};
///
/// #[derive(FromRow)]
/// struct Fruit {
///     id: i32,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let pool = MySqlPool::connect("mysql://localhost/test").await?;
/// let query = PreparedQueryAs::<Fruit>::new(
///     "SELECT id, name FROM fruits WHERE color IN (?)",
///     &Params::positional([vec!["red", "green"]]),
/// )?;
///
/// for fruit in query.fetch_all(&pool).await? {
///     println!("{}: {}", fruit.id, fruit.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreparedQueryAs<R> {
    sql: String,
    values: Vec<Value>,
    _pd: std::marker::PhantomData<R>,
}

impl<R> PreparedQueryAs<R>
where
    for<'row> R: sqlx::FromRow<'row, MySqlRow> + Send + Unpin,
{
    /// Creates a new `PreparedQueryAs` using a MySQL [`Rebuilder`].
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

    /// Creates a new `PreparedQueryAs` with an existing [`Rebuilder`].
    pub fn with_rebuilder<T>(rebuilder: &Rebuilder, template: T, params: &Params) -> crate::Result<Self>
    where
        T: AsRef<str>,
    {
        let BuiltQuery { sql, values } = build_query(rebuilder, template.as_ref(), params)?;
        Ok(Self {
            sql,
            values,
            _pd: std::marker::PhantomData,
        })
    }

    /// The driver-ready SQL.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in binding order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn query(&self) -> crate::Result<QA<'_, R>> {
        tracing::debug!(sql = %self.sql, binds = self.values.len(), "fetching rows");
        Ok(sqlx::query_as_with(&self.sql, arguments(&self.values)?))
    }

    /// Executes the query and returns all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if any row cannot be converted to type `R`.
    pub async fn fetch_all<'e, E>(&self, executor: E) -> crate::Result<Vec<R>>
    where
        E: Executor<'e, Database = MySql>,
    {
        Ok(self.query()?.fetch_all(executor).await?)
    }

    /// Executes the query and returns exactly one row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No rows are found
    /// - The query fails
    /// - The row cannot be converted to type `R`
    pub async fn fetch_one<'e, E>(&self, executor: E) -> crate::Result<R>
    where
        E: Executor<'e, Database = MySql>,
    {
        Ok(self.query()?.fetch_one(executor).await?)
    }

    /// Executes the query and returns at most one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be converted to type `R`.
    pub async fn fetch_optional<'e, E>(&self, executor: E) -> crate::Result<Option<R>>
    where
        E: Executor<'e, Database = MySql>,
    {
        Ok(self.query()?.fetch_optional(executor).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Param;

    #[derive(sqlx::FromRow)]
    struct TestRow {
        #[allow(dead_code)]
        id: i32,
    }

    #[test]
    fn test_prepared_query_as_new() {
        let result = PreparedQueryAs::<TestRow>::new(
            "SELECT id FROM users WHERE id = :id",
            &Params::new().bind("id", 1),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_prepared_query_as_positional_lists() {
        let query = PreparedQueryAs::<TestRow>::new(
            "SELECT id FROM users WHERE id IN (?) AND name = ?",
            &Params::positional([Param::from(vec![4, 5]), Param::from("Jane")]),
        )
        .unwrap();

        assert_eq!(query.sql(), "SELECT id FROM users WHERE id IN (?, ?) AND name = ?");
        assert_eq!(query.values().len(), 3);
    }
}
