/// Builds a native [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys must be string literals. Any other token tree is converted
/// through [`to_value`](crate::to_value); wrap multi-token expressions such
/// as `-1` or function calls in parentheses.
///
/// ```rust
/// use toml_native::{value, Value};
///
/// let doc = value!({
///     "title": "TOML Example",
///     "ports": [8000, 8001],
///     "offset": (-1),
///     "enabled": true
/// });
/// assert_eq!(doc.get("offset"), Some(&Value::Integer(-1)));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Seq(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Seq(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Anything serializable
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
