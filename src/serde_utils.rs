/// Serde utility functions for common patterns
use serde::Deserializer;
use std::fmt;

/// Deserialize a field the API sends either as a JSON number or as a string.
///
/// The patients endpoint returns `phoneNumber` as a number in list responses
/// and as a string for a single patient; both end up as `String`.
///
/// Usage:
/// ```ignore
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Example {
///     #[serde(deserialize_with = "crate::serde_utils::string_or_number")]
///     phone_number: String,
/// }
/// ```
pub fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl serde::de::Visitor<'_> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            // whole numbers that came through a float encoder
            if v.fract() == 0.0 && v.is_finite() {
                Ok(format!("{}", v as i64))
            } else {
                Ok(v.to_string())
            }
        }
    }

    de.deserialize_any(StringOrNumberVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Phone {
        #[serde(deserialize_with = "super::string_or_number")]
        value: String,
    }

    fn parse(json: &str) -> String {
        serde_json::from_str::<Phone>(json).unwrap().value
    }

    #[test]
    fn test_accepts_number() {
        assert_eq!(parse(r#"{"value": 123456789}"#), "123456789");
    }

    #[test]
    fn test_accepts_string() {
        assert_eq!(parse(r#"{"value": "123-456-789"}"#), "123-456-789");
    }

    #[test]
    fn test_accepts_whole_float() {
        assert_eq!(parse(r#"{"value": 500600700.0}"#), "500600700");
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(serde_json::from_str::<Phone>(r#"{"value": true}"#).is_err());
    }
}
