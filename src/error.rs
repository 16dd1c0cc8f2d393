use crate::params::ParamKey;

/// Error types for sqlx-array-bind
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dialect or placeholder pattern failed to compile
    #[error("Failed to compile SQL pattern: {0}")]
    Parse(#[from] regex::Error),

    /// Error from SQLx database operations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Placeholder appears in the statement but has no bound value
    #[error("Parameter {0} is missing from the bound values")]
    MissingParameter(ParamKey),

    /// A statement handed to positional conversion still holds a bare `?`
    #[error("Statement contains a '?' placeholder that was not rebuilt")]
    UnexpandedPositional,

    /// A generated placeholder name was already used in the same statement
    #[error("Placeholder ':{0}' is generated more than once")]
    PlaceholderCollision(String),
}

/// Result type alias for sqlx-array-bind operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_messages() {
        let err = Error::MissingParameter(ParamKey::Position(3));
        assert_eq!(err.to_string(), "Parameter 3 is missing from the bound values");

        let err = Error::MissingParameter(ParamKey::Name("missing".into()));
        assert_eq!(
            err.to_string(),
            "Parameter 'missing' is missing from the bound values"
        );
    }
}
