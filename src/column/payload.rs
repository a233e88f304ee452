// Payload Columns
//
// Columns whose cell holds an encoded payload (JSON text, bincode bytes). The
// payload is scanned as raw bytes and decoded into the setter's value type
// when the column is applied.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::column::{mutation_error, Func};
use crate::common::{BoxError, ScanError, ScanResult};

/// A codec for column payloads
pub trait PayloadCodec {
    /// Codec name, reported in decode errors
    const NAME: &'static str;

    fn decode<V: DeserializeOwned>(payload: &[u8]) -> Result<V, BoxError>;

    fn encode<V: Serialize>(value: &V) -> Result<Vec<u8>, BoxError>;
}

/// JSON payloads, via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl PayloadCodec for Json {
    const NAME: &'static str = "json";

    fn decode<V: DeserializeOwned>(payload: &[u8]) -> Result<V, BoxError> {
        Ok(serde_json::from_slice(payload)?)
    }

    fn encode<V: Serialize>(value: &V) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }
}

/// Bincode payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct Bincode;

impl PayloadCodec for Bincode {
    const NAME: &'static str = "bincode";

    fn decode<V: DeserializeOwned>(payload: &[u8]) -> Result<V, BoxError> {
        Ok(::bincode::deserialize(payload)?)
    }

    fn encode<V: Serialize>(value: &V) -> Result<Vec<u8>, BoxError> {
        Ok(::bincode::serialize(value)?)
    }
}

fn decode<C: PayloadCodec, V: DeserializeOwned>(payload: &[u8]) -> ScanResult<V> {
    C::decode(payload).map_err(|source| ScanError::Decode { codec: C::NAME, source })
}

/// Column decoding its payload with codec `C` before calling `set`
pub fn payload<C, T, V, F>(set: F) -> Func<T, Vec<u8>>
where
    C: PayloadCodec,
    V: DeserializeOwned,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    Func::new(move |target, bytes: Vec<u8>| {
        set(target, decode::<C, V>(&bytes)?);
        Ok(())
    })
}

/// Like `payload`, with a setter that can reject the decoded value
pub fn payload_err<C, T, V, F, E>(set: F) -> Func<T, Vec<u8>>
where
    C: PayloadCodec,
    V: DeserializeOwned,
    F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Func::new(move |target, bytes: Vec<u8>| {
        set(target, decode::<C, V>(&bytes)?).map_err(mutation_error)
    })
}

/// Column holding a JSON document
pub fn json<T, V, F>(set: F) -> Func<T, Vec<u8>>
where
    V: DeserializeOwned,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    payload::<Json, T, V, F>(set)
}

pub fn json_err<T, V, F, E>(set: F) -> Func<T, Vec<u8>>
where
    V: DeserializeOwned,
    F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    payload_err::<Json, T, V, F, E>(set)
}

/// Column holding a bincode-encoded value
pub fn bincode<T, V, F>(set: F) -> Func<T, Vec<u8>>
where
    V: DeserializeOwned,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    payload::<Bincode, T, V, F>(set)
}

pub fn bincode_err<T, V, F, E>(set: F) -> Func<T, Vec<u8>>
where
    V: DeserializeOwned,
    F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    payload_err::<Bincode, T, V, F, E>(set)
}
