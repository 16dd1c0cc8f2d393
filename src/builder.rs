use crate::error::Error;
use crate::params::{ParamKey, Params};
use crate::rebuilder::{Rebuilder, Rebuilt, Segment};
use crate::value::Value;

/// Driver-ready SQL with positional bind markers and values in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// SQL using the dialect's bind markers (`?` or `$n`).
    pub sql: String,
    /// One value per bind marker, in the order the markers appear.
    pub values: Vec<Value>,
}

/// Rebuilds `template` against `params` and converts the result to the
/// dialect's positional bind markers (`?` or `$n`).
///
/// # Examples
///
/// ```
/// use sqlx_array_bind::builder::build_query;
/// use sqlx_array_bind::{Params, Rebuilder, Value};
///
/// let rebuilder = Rebuilder::new("mysql")?;
/// let params = Params::new().bind("ids", vec![1, 3]).bind("name", "Apple");
/// let built = build_query(&rebuilder, "SELECT * FROM fruits WHERE id IN (:ids) AND name = :name", &params)?;
///
/// assert_eq!(built.sql, "SELECT * FROM fruits WHERE id IN (?, ?) AND name = ?");
/// assert_eq!(built.values, vec![Value::Int(1), Value::Int(3), Value::from("Apple")]);
/// # Ok::<(), sqlx_array_bind::Error>(())
/// ```
pub fn build_query(rebuilder: &Rebuilder, template: &str, params: &Params) -> crate::Result<BuiltQuery> {
    let rebuilt = rebuilder.rebuild(template, params)?;
    to_positional(rebuilder, &rebuilt)
}

/// Replaces every live `:name` placeholder of a rebuilt statement with a
/// positional bind marker, collecting its value in textual order.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] if a `:name` has no entry in
/// `rebuilt.values`, and [`Error::UnexpandedPositional`] if the statement
/// still holds a bare `?`, which a [`Rebuilder::rebuild`] result never does.
pub fn to_positional(rebuilder: &Rebuilder, rebuilt: &Rebuilt) -> crate::Result<BuiltQuery> {
    let dialect = rebuilder.dialect();
    let mut sql = String::with_capacity(rebuilt.statement.len());
    let mut values = Vec::with_capacity(rebuilt.values.len());

    for chunk in rebuilder.tokenizer().split(&rebuilt.statement) {
        if rebuilder.is_opaque(chunk) {
            sql.push_str(chunk);
            continue;
        }
        for segment in rebuilder.segments(chunk) {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Named(name) => {
                    let value = rebuilt
                        .values
                        .get(name)
                        .ok_or_else(|| Error::MissingParameter(ParamKey::Name(name.to_owned())))?;
                    values.push(value.clone());
                    dialect.write_bind_marker(values.len(), &mut sql);
                }
                Segment::Positional => return Err(Error::UnexpandedPositional),
            }
        }
    }

    Ok(BuiltQuery { sql, values })
}
