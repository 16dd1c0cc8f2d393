//! # sqlx-array-bind
//!
//! Array-aware placeholder binding for SQLx: bind a list to a single `?` or
//! `:name` placeholder and have it expanded into an `IN (...)` list of
//! uniquely named placeholders.
//!
//! ## Features
//!
//! - **Array Expansion**: `id IN (:ids)` with `ids = [1, 3, 5]` becomes `id IN (:ids_0, :ids_1, :ids_2)`
//! - **Literal Aware**: placeholders inside string, identifier and dollar-quoted literals are left alone
//! - **Dialects**: MySQL, PostgreSQL and SQLite quoting rules, selected from a driver name or URL
//! - **Collision Free**: positional placeholders become `:__1, :__2, ...`; reused names get `__k` suffixes
//! - **SQLx Execution**: `PreparedQuery` and `PreparedQueryAs` bind the expanded values against MySQL
//!
//! ## Examples
//!
//! ### Rebuilding a Statement
//!
//! ```rust
//! use sqlx_array_bind::{Params, Rebuilder, Value};
//!
//! let rebuilder = Rebuilder::new("sqlite")?;
//! let (sql, values) = rebuilder
//!     .rebuild(
//!         "SELECT * FROM fruits WHERE id IN (?) OR id IN (?)",
//!         &Params::positional([vec![1, 3], vec![5]]),
//!     )?
//!     .into_parts();
//!
//! assert_eq!(sql, "SELECT * FROM fruits WHERE id IN (:__1, :__2) OR id IN (:__3)");
//! assert_eq!(values["__3"], Value::Int(5));
//! # Ok::<(), sqlx_array_bind::Error>(())
//! ```
//!
//! ### Executing with SQLx
//!
//! ```rust,no_run
//! use sqlx::{MySqlPool, FromRow};
//! use sqlx_array_bind::{Params, PreparedQueryAs};
//!
//! #[derive(FromRow)]
//! struct User {
//!     id: i32,
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = MySqlPool::connect("mysql://localhost/test").await?;
//!
//! let query = PreparedQueryAs::<User>::new(
//!     "SELECT id, name FROM users WHERE id IN (:ids) AND active = :active",
//!     &Params::new().bind("ids", vec![1, 2, 3]).bind("active", true),
//! )?;
//!
//! let users: Vec<User> = query.fetch_all(&pool).await?;
//! println!("Found {} users", users.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! 1. **Tokenize**: split the statement so every literal is its own chunk
//! 2. **Rebuild**: in live chunks, replace each `?`/`:name` with one generated placeholder per bound element
//! 3. **Bind**: for SQLx, convert the generated names to positional markers and bind the values in order
//!
//! ## Limitations
//!
//! - Only `?` and `:name` placeholders are recognized; names must match `[a-zA-Z_][a-zA-Z0-9_]*`
//! - SQL comments are not skipped
//! - The SQLx execution layer targets MySQL

pub mod builder;
pub mod dialect;
pub mod error;
pub mod params;
pub mod query;
pub mod query_as;
pub mod rebuilder;
pub mod tokenizer;
pub mod value;

pub use dialect::Dialect;
pub use error::{Error, Result};
pub use params::{ParamKey, Params};
pub use query::PreparedQuery;
pub use query_as::PreparedQueryAs;
pub use rebuilder::{Rebuilder, Rebuilt};
pub use tokenizer::Tokenizer;
pub use value::{Param, Value};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::{Params, PreparedQuery, PreparedQueryAs, Rebuilder, Value};
}
