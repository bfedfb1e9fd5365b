pub mod id {
    use core::fmt;

    use serde::{
        de::{self, Visitor},
        Deserializer,
    };

    use crate::id::{HasId, Id};

    /// The tracking service is not consistent about id types, some records
    /// carry numeric ids and others strings. Both are kept as strings.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Id<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: HasId,
        T::IdType: From<String>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or an integer id")
            }

            fn visit_str<E>(self, value: &str) -> Result<String, E>
            where
                E: de::Error,
            {
                Ok(value.to_owned())
            }

            fn visit_string<E>(self, value: String) -> Result<String, E>
            where
                E: de::Error,
            {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<String, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_u64<E>(self, value: u64) -> Result<String, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }
        }

        deserializer
            .deserialize_any(IdVisitor)
            .map(|raw| Id::new(raw.into()))
    }

    pub fn deserialize_option<'de, D, T>(
        deserializer: D,
    ) -> Result<Option<Id<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: HasId,
        T::IdType: From<String>,
    {
        #[derive(serde::Deserialize)]
        struct Wrapper<T>(#[serde(deserialize_with = "deserialize")] Id<T>)
        where
            T: HasId,
            T::IdType: From<String>;

        let value = <Option<Wrapper<T>> as serde::Deserialize>::deserialize(
            deserializer,
        )?;
        Ok(value.map(|Wrapper(id)| id))
    }
}

/// Timestamps exchanged with the tracking service are milliseconds since
/// the unix epoch.
pub mod timestamp_millis {
    use chrono::{DateTime, TimeZone as _, Utc};
    use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S>(
        date_time: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(date_time.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {millis}")))
    }
}
