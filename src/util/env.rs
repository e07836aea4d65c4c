//! Process configuration, deserialized straight from environment variables.
//!
//! Deserialization follows the approach of the [`envy`] crate: every variable becomes a map
//! entry keyed by its name, and values are parsed on demand by the type serde asks for. Unlike
//! [`envy`], this works with `rename`-type derive macros on the target struct.
//!
//! [`envy`]: https://github.com/softprops/envy

use core::fmt;

use serde::Deserialize;
use serde::de::value::MapDeserializer;
use serde::de::{self, IntoDeserializer};
use thiserror::Error;

use crate::constants::{SERVER_PORT, SERVICE_NAME, TRACER_NAME};

#[derive(Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Env {
    #[serde(deserialize_with = "non_empty_key")]
    pub youtube_api_key: String,
    pub redis_url: Option<String>,
    #[serde(default = "default_port")]
    pub server_api_port: u16,
    pub otel_exporter_otlp_endpoint: Option<String>,
    #[serde(default = "default_service_name")]
    pub api_service_name: String,
    #[serde(default = "default_tracer_name")]
    pub api_tracer_name: String,
}

impl Env {
    /// Reads the process environment, loading a `.env` file first if one exists
    pub fn new() -> EnvResult<Self> {
        Ok(from_env::<Env>()?)
    }
}

// the api key must never end up in a log line
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("youtube_api_key", &"[REDACTED]")
            .field("redis_url", &self.redis_url)
            .field("server_api_port", &self.server_api_port)
            .field(
                "otel_exporter_otlp_endpoint",
                &self.otel_exporter_otlp_endpoint,
            )
            .field("api_service_name", &self.api_service_name)
            .field("api_tracer_name", &self.api_tracer_name)
            .finish()
    }
}

/// A blank key is reported the same as an absent one
fn non_empty_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: de::Deserializer<'de>,
{
    let key = String::deserialize(deserializer)?;
    if key.trim().is_empty() {
        return Err(<D::Error as de::Error>::missing_field("YOUTUBE_API_KEY"));
    }

    Ok(key)
}

fn default_port() -> u16 {
    SERVER_PORT
}

fn default_service_name() -> String {
    SERVICE_NAME.to_string()
}

fn default_tracer_name() -> String {
    TRACER_NAME.to_string()
}

// ---
//  Deserializer implementation
// ---

/// A single variable's value, tagged with its name for error reporting
struct Val {
    name: String,
    value: String,
}

impl<'de> IntoDeserializer<'de, EnvDeserializeError> for Val {
    type Deserializer = Self;
    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

macro_rules! parse_val {
    ($($ty:ident => $method:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, EnvDeserializeError>
            where
                V: de::Visitor<'de>
            {
                match self.value.trim().parse::<$ty>() {
                    Ok(val) => val.into_deserializer().$method(visitor),
                    Err(e) => Err(EnvDeserializeError::BadValue {
                        name: self.name,
                        value: self.value,
                        reason: e.to_string(),
                    }),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Val {
    type Error = EnvDeserializeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.value.into_deserializer().deserialize_any(visitor)
    }

    /// An empty variable (`REDIS_URL=`) counts as unset
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        if self.value.trim().is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    parse_val! {
        bool => deserialize_bool,
        u16 => deserialize_u16,
        u32 => deserialize_u32,
        u64 => deserialize_u64,
        i64 => deserialize_i64,
        f64 => deserialize_f64,
    }

    serde::forward_to_deserialize_any! {
        i8 i16 i32 u8 f32 char str string unit bytes byte_buf seq map
        unit_struct tuple_struct identifier tuple enum ignored_any struct
    }
}

pub fn from_env<T>() -> Result<T, EnvDeserializeError>
where
    T: de::DeserializeOwned,
{
    from_iter(dotenvy::vars())
}

pub fn from_iter<Iter, T>(iter: Iter) -> Result<T, EnvDeserializeError>
where
    T: de::DeserializeOwned,
    Iter: IntoIterator<Item = (String, String)>,
{
    let vars = iter
        .into_iter()
        .map(|(name, value)| (name.clone(), Val { name, value }));

    T::deserialize(MapDeserializer::<_, EnvDeserializeError>::new(vars))
}

impl de::Error for EnvDeserializeError {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        EnvDeserializeError::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        EnvDeserializeError::MissingValue(field)
    }
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error(transparent)]
    DeserializationError(#[from] EnvDeserializeError),
}

#[derive(Debug, Error)]
pub enum EnvDeserializeError {
    #[error("env deserialization error: {0}")]
    Custom(String),

    #[error("missing required environment variable '{0}'")]
    MissingValue(&'static str),

    #[error("invalid value '{value}' for '{name}': {reason}")]
    BadValue {
        name: String,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply() {
        let env: Env = from_iter(vars(&[
            ("YOUTUBE_API_KEY", "abc123"),
            ("PATH", "/usr/bin"),
        ]))
        .unwrap();

        assert_eq!(env.youtube_api_key, "abc123");
        assert_eq!(env.redis_url, None);
        assert_eq!(env.server_api_port, SERVER_PORT);
        assert_eq!(env.otel_exporter_otlp_endpoint, None);
        assert_eq!(env.api_service_name, SERVICE_NAME);
        assert_eq!(env.api_tracer_name, TRACER_NAME);
    }

    #[test]
    fn test_all_vars_set() {
        let env: Env = from_iter(vars(&[
            ("YOUTUBE_API_KEY", "abc123"),
            ("REDIS_URL", "redis://127.0.0.1:6380"),
            ("SERVER_API_PORT", "8080"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            ("API_SERVICE_NAME", "goal-page"),
        ]))
        .unwrap();

        assert_eq!(env.redis_url.as_deref(), Some("redis://127.0.0.1:6380"));
        assert_eq!(env.server_api_port, 8080);
        assert_eq!(
            env.otel_exporter_otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
        assert_eq!(env.api_service_name, "goal-page");
    }

    #[test]
    fn test_empty_optional_is_unset() {
        let env: Env = from_iter(vars(&[("YOUTUBE_API_KEY", "abc123"), ("REDIS_URL", "")])).unwrap();
        assert_eq!(env.redis_url, None);
    }

    #[test]
    fn test_missing_api_key() {
        let err = from_iter::<_, Env>(vars(&[("REDIS_URL", "redis://localhost")])).unwrap_err();
        assert!(matches!(
            err,
            EnvDeserializeError::MissingValue("YOUTUBE_API_KEY")
        ));
    }

    #[test]
    fn test_empty_api_key() {
        for key in ["", "   ", "\t"] {
            let err = from_iter::<_, Env>(vars(&[("YOUTUBE_API_KEY", key)])).unwrap_err();
            assert!(
                matches!(err, EnvDeserializeError::MissingValue("YOUTUBE_API_KEY")),
                "key: {key:?}, err: {err:?}"
            );
        }
    }

    #[test]
    fn test_bad_port() {
        let err = from_iter::<_, Env>(vars(&[
            ("YOUTUBE_API_KEY", "abc123"),
            ("SERVER_API_PORT", "http"),
        ]))
        .unwrap_err();

        match err {
            EnvDeserializeError::BadValue { name, value, .. } => {
                assert_eq!(name, "SERVER_API_PORT");
                assert_eq!(value, "http");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let env: Env = from_iter(vars(&[("YOUTUBE_API_KEY", "super-secret")])).unwrap();
        let printed = format!("{env:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("[REDACTED]"));
    }
}
