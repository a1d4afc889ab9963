//! Custom deserializers for flexible form parsing.
//!
//! Browser forms send every value as a string while JSON clients send numbers
//! for numeric fields. Both end up as the same raw string so that validation
//! happens in exactly one place.

use serde::Deserializer;
use serde::de::{self, Visitor};
use std::fmt;

/// Deserializes a string, integer, float or bool into its string form.
///
/// # Accepted Formats
///
/// ```json
/// { "age": 50 }             // Integer → "50"
/// { "bmi": 27.5 }           // Float → "27.5"
/// { "bmi": "27.5" }         // String kept as-is
/// { "hypertension": true }  // Bool → "1"
/// ```
///
/// `null` becomes the empty string, which later fails validation as a
/// missing value.
pub fn de_string_forgiving<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ForgivingString;

    impl<'de> Visitor<'de> for ForgivingString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(if v { "1" } else { "0" }.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ForgivingString)
}
