//! Gradle build script parser.
//!
//! Reads the Groovy DSL of a `build.gradle` file into a plain data tree
//! without evaluating any of it. The result is a best-effort structural
//! reading: blocks become nested documents, `key value` lines become
//! entries, and `dependencies` / `repositories` blocks become typed records.
//!
//! # Parsing Pipeline
//!
//! A single forward scan does all the work:
//!
//! 1. **Scanner**: A cursor over the source characters that also carries the
//!    comment filter and the nesting counter.
//!
//! 2. **Structural parser**: Splits each logical line into a key and a
//!    value, recursing on `{` and returning on `}`. Conditionals, method
//!    definitions and standalone calls are skipped.
//!
//! 3. **Closure interpreters**: Block bodies are handed to an interpreter
//!    chosen by the block key, producing nested documents, dependency
//!    declarations or repository entries.
//!
//! Malformed input never fails; only I/O and the limits in [`ParseOptions`]
//! produce errors.

mod closure;
mod error;
mod literal;
mod options;
mod parser;
mod scanner;
mod skip;
mod value;

pub use error::{ParseError, Result};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES};
pub use value::{
    deep_merge, DependencyDeclaration, Document, ExcludeRule, RepositoryData, RepositoryEntry,
    Value,
};

use parser::ScopeMode;
use scanner::Cursor;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a build script held in memory.
///
/// # Example
///
/// ```
/// use libgradle::parse_text;
///
/// let doc = parse_text("android {\n  compileSdkVersion 23\n}").unwrap();
/// let android = doc["android"].as_document().unwrap();
/// assert_eq!(android["compileSdkVersion"].as_str(), Some("23"));
/// ```
pub fn parse_text(input: &str) -> Result<Document> {
    parse_text_with(input, &ParseOptions::default())
}

/// Parse a build script held in memory with explicit options.
pub fn parse_text_with(input: &str, options: &ParseOptions) -> Result<Document> {
    if input.len() > options.max_input_bytes {
        return Err(ParseError::InputTooLarge(
            input.len(),
            options.max_input_bytes,
        ));
    }
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let chars: Vec<char> = input.chars().collect();
    let mut cursor = Cursor::new(&chars, options);

    debug!(
        bytes = input.len(),
        filename = options.filename.as_deref().unwrap_or("<text>"),
        "parsing build script"
    );
    let doc = parser::parse_scope(&mut cursor, ScopeMode::DOCUMENT)?;
    debug!(keys = doc.len(), "parsed build script");
    Ok(doc)
}

/// Read and parse a build script from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    parse_file_with(path, &ParseOptions::default())
}

/// Read and parse a build script from disk with explicit options.
///
/// The file's path is used in error messages unless `options` already names
/// one.
pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let input =
        fs::read_to_string(path).map_err(|e| ParseError::Io(path.display().to_string(), e))?;
    let mut options = options.clone();
    if options.filename.is_none() {
        options.filename = Some(path.display().to_string());
    }
    parse_text_with(&input, &options)
}
