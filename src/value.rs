/// A single bindable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// What a caller binds to one placeholder: a single value, or a list that
/// the placeholder expands into (one generated placeholder per element).
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    List(Vec<Value>),
}

impl Param {
    /// Returns `true` if this parameter is array-valued.
    pub fn is_list(&self) -> bool {
        matches!(self, Param::List(_))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }

            impl From<$t> for Param {
                fn from(v: $t) -> Self {
                    Param::Value(v.into())
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Value> for Param {
    fn from(v: Value) -> Self {
        Param::Value(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Value(v.into())
    }
}

impl From<f32> for Param {
    fn from(v: f32) -> Self {
        Param::Value(v.into())
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Value(v.into())
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Value(v.into())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Value(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        Param::Value(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Param {
    fn from(v: Vec<T>) -> Self {
        Param::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Param {
    fn from(v: &[T]) -> Self {
        Param::List(v.iter().cloned().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(6), Value::Int(6));
        assert_eq!(Value::from(200u32), Value::Int(200));
        assert_eq!(Value::from("Apple"), Value::Text("Apple".into()));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("red")), Value::Text("red".into()));
    }

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(Value::from(None::<&str>).is_null());
        assert!(!Value::Int(0).is_null());
        assert!(!Value::from("").is_null());
    }

    #[test]
    fn test_param_from_vec_is_list() {
        let param = Param::from(vec![1, 3, 5, 7]);
        assert!(param.is_list());
        assert_eq!(
            param,
            Param::List(vec![Value::Int(1), Value::Int(3), Value::Int(5), Value::Int(7)])
        );
    }

    #[test]
    fn test_param_from_none_is_scalar_null() {
        let param = Param::from(None::<&str>);
        assert!(!param.is_list());
        assert_eq!(param, Param::Value(Value::Null));
    }
}
