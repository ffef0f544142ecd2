//! YAML transcoding.
//!
//! Documents become mappings in source key order, sequences and record
//! lists become YAML sequences. Text stays text, so numeric-looking values
//! are quoted by the emitter.

use libgradle::Document;

/// Encode a document as YAML text.
pub fn encode(doc: &Document) -> Result<String, String> {
    serde_yaml::to_string(doc).map_err(|e| format!("YAML encode error: {}", e))
}
