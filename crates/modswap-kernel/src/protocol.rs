//! Protocol parser port
//!
//! Raw payloads become structured events by parsing them against a packet
//! definition at a specific version. The parser itself lives in the host.

use serde_json::Value;
use thiserror::Error;

use crate::dispatch::MessageCode;

/// Errors from parsing a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No packet definition exists for this code at this version.
    #[error("no definition for code {code} at version {version}")]
    UnknownDefinition { code: MessageCode, version: u32 },

    /// The payload does not match the definition.
    #[error("malformed payload for code {code}: {reason}")]
    Malformed { code: MessageCode, reason: String },
}

/// Port onto the host protocol parser.
pub trait ProtocolCodec {
    /// Parse `payload` as the packet `code` using the definition at
    /// `definition_version`, under the given protocol version.
    fn parse(
        &self,
        protocol_version: u32,
        code: MessageCode,
        definition_version: u32,
        payload: &[u8],
    ) -> Result<Value, ParseError>;
}
