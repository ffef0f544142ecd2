//! Output encoders for parsed build scripts.

pub mod cbor;
pub mod toml;
pub mod yaml;

use clap::ValueEnum;
use libgradle::Document;

/// Output format selected with `--to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    #[value(alias = "yml")]
    Yaml,
    Toml,
    Cbor,
}

impl Format {
    /// File extension used by `--write`.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Cbor => "cbor",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Format::Cbor)
    }
}

/// Encode a document in the given format.
pub fn encode(doc: &Document, format: Format) -> Result<Vec<u8>, String> {
    match format {
        Format::Json => serde_json::to_string_pretty(doc)
            .map(String::into_bytes)
            .map_err(|e| format!("JSON encode error: {}", e)),
        Format::Yaml => yaml::encode(doc).map(String::into_bytes),
        Format::Toml => toml::encode(doc).map(String::into_bytes),
        Format::Cbor => cbor::encode(doc),
    }
}
