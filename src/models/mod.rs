//! Record models for the pipeline.
//!
//! Each table has a raw form (every field optional, exactly as it comes off
//! disk) and a cleaned form whose types carry the post-cleaning invariants.
//! Cleaned records are plain owned values; stages hand whole tables to each
//! other as `Vec<T>` and never mutate a table they did not produce.

pub mod customer;
pub mod features;
pub mod transaction;

pub use customer::{Customer, RawCustomer};
pub use features::CustomerFeatures;
pub use transaction::{RawTransaction, Transaction};

/// Placeholder written into `currency` and `category` when the source value
/// is null or empty and nothing can be inferred.
pub const NA: &str = "NA";

/// Serde helpers for the `%Y-%m-%d %H:%M:%S` timestamp format used by the
/// transaction sources.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }

    /// Variant for optional timestamps; an empty field is `None`.
    pub mod option {
        use super::FORMAT;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
                None => serializer.serialize_str(""),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let s = Option::<String>::deserialize(deserializer)?;
            match s.as_deref() {
                None | Some("") => Ok(None),
                Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
