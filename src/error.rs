use thiserror::Error;

/// Everything that can go wrong turning JSON text into a [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("unrecognized sigil {sigil:?}")]
    UnrecognizedSigil { sigil: String },

    #[error("malformed payload for sigil {sigil:?}: {reason} (got {payload})")]
    MalformedSigilPayload {
        sigil: String,
        reason: String,
        payload: String,
    },

    #[error("integer {literal} overflows a 64-bit integer and was not Z-wrapped")]
    IntegerOverflow { literal: String },

    #[error("path/subgraph sequence references unknown element id {id:?}")]
    GraphReferenceMissing { id: String },
}

impl DecodeError {
    pub(crate) fn unrecognized_sigil(sigil: impl Into<String>) -> Self {
        DecodeError::UnrecognizedSigil {
            sigil: sigil.into(),
        }
    }

    pub(crate) fn malformed_payload(
        sigil: impl Into<String>,
        reason: impl Into<String>,
        payload: &serde_json::Value,
    ) -> Self {
        DecodeError::MalformedSigilPayload {
            sigil: sigil.into(),
            reason: reason.into(),
            payload: payload.to_string(),
        }
    }
}

/// Everything that can go wrong turning a [`Value`](crate::Value) into JSON text.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("value cannot be represented in Jolt: {reason}")]
    UnrepresentableValue { reason: String },

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
