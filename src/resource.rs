//! Single-document conversion dispatched by document type.

use tracing::debug;

use crate::error::RulesError;
use crate::generator;
use crate::params::{ConversionParams, DocType};
use crate::transcoder::{Conversion, Transcoder};

const MISSING_CONTENT: &str = "type=generate requires a content parameter";

/// Check that `params` names a supported conversion without looking at any
/// document body, so unsupported requests fail before a fetch.
pub fn validate(params: &ConversionParams) -> Result<(), RulesError> {
    match &params.doc_type {
        DocType::Rule => Conversion::resolve(params).map(|_| ()),
        DocType::Generate if params.content.is_none() => {
            Err(RulesError::InvalidParams(MISSING_CONTENT.into()))
        }
        DocType::Generate => Ok(()),
        other => Err(RulesError::Unsupported(format!("type {}", other))),
    }
}

/// Produce the converted document for `params`.
///
/// `type=rule` transcodes `content`; `type=generate` decodes the inline
/// `content` parameter and ignores `content`. Output lines are joined with
/// `\n`. Other types are unsupported.
pub fn convert_resource(
    transcoder: &Transcoder,
    params: &ConversionParams,
    content: &str,
) -> Result<String, RulesError> {
    validate(params)?;

    debug!(
        doc_type = %params.doc_type,
        subtype = %params.subtype,
        src = %params.src,
        dst = %params.dst,
        "converting resource"
    );

    let lines = match (&params.doc_type, params.content.as_deref()) {
        (DocType::Generate, Some(encoded)) => generator::generate(encoded)?,
        _ => transcoder.convert(params, content)?,
    };

    Ok(lines.join("\n"))
}
