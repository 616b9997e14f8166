use serde::{de, Deserializer};
use std::fmt;

struct Visitor;

impl<'de> de::Visitor<'de> for Visitor {
    type Value = Option<i32>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an integer id")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v.trim().parse().ok())
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(i32::try_from(v).ok())
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(i32::try_from(v).ok())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }
}

/// Reads an optional id from a query string, treating empty or malformed
/// values as absent. Use with `#[serde(default, deserialize_with = ...)]`.
pub fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_lenient_id")]
        grade: Option<i32>,
    }

    fn grade(json: &str) -> Option<i32> {
        serde_json::from_str::<Query>(json).unwrap().grade
    }

    #[test]
    fn parses_lenient_ids() {
        assert_eq!(grade(r#"{"grade": "3"}"#), Some(3));
        assert_eq!(grade(r#"{"grade": 4}"#), Some(4));
        assert_eq!(grade(r#"{"grade": ""}"#), None);
        assert_eq!(grade(r#"{"grade": "abc"}"#), None);
        assert_eq!(grade(r#"{"grade": null}"#), None);
        assert_eq!(grade("{}"), None);
    }
}
