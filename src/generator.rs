//! Inline rule content supplied as a base64 parameter.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::RulesError;

/// Standard alphabet, trailing `=` padding optional.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode an inline base64 rule body into its non-empty, trimmed lines.
///
/// Never touches the network. Fails with `InvalidBase64` when the input is
/// not base64 or does not decode to UTF-8, and with `EmptyContent` when the
/// decoded text has no non-empty line.
pub fn generate(encoded: &str) -> Result<Vec<String>, RulesError> {
    let bytes = LENIENT_STANDARD
        .decode(encoded.trim())
        .map_err(|e| RulesError::InvalidBase64(e.to_string()))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| RulesError::InvalidBase64(format!("decoded content is not UTF-8: {}", e)))?;

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(RulesError::EmptyContent);
    }

    Ok(lines)
}
