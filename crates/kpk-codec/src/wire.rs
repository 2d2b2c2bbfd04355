//! Shared prefix + base64 + JSON envelope used by both schemes.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::scheme::Scheme;

/// URL-safe alphabet. Encodes without padding; decodes with or without it,
/// since label printers upstream are not consistent about trailing `=`.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub(crate) fn encode<T: Serialize>(scheme: Scheme, document: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(document)?;
    Ok(format!("{}{}", scheme.prefix(), ENGINE.encode(json)))
}

pub(crate) fn decode<T: DeserializeOwned>(scheme: Scheme, raw: &str) -> Result<T, CodecError> {
    let body = raw
        .strip_prefix(scheme.prefix())
        .ok_or(CodecError::MissingPrefix {
            expected: scheme.prefix(),
        })?;
    let bytes = ENGINE.decode(body)?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}
