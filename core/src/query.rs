//! Caller-supplied query parameters.
//!
//! A value is either a single string or a sequence of strings. Sequences are
//! sent as repeated keys (`k=a&k=b`), never comma-joined or bracketed.

/// Value of one caller-supplied query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// The individual values in send order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            QueryValue::Single(v) => std::slice::from_ref(v),
            QueryValue::Multi(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(values: &[&str]) -> Self {
        QueryValue::Multi(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Ordered list of query parameters. Order of keys is preserved on the wire.
pub type QueryParams = Vec<(String, QueryValue)>;

/// Convenience constructor: `query([("entityType", "location".into())])`.
pub fn query<K, I>(pairs: I) -> QueryParams
where
    K: Into<String>,
    I: IntoIterator<Item = (K, QueryValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
