//! Parser configuration.

/// Default limit on block nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default input budget: 16 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

/// Resource limits and reporting options for one parse.
///
/// The scanner never moves backwards, so bounding the input size also bounds
/// the work done by a parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Deepest block nesting accepted before failing with
    /// [`ParseError::NestingTooDeep`](crate::ParseError::NestingTooDeep).
    pub max_depth: usize,
    /// Largest input, in bytes, accepted before failing with
    /// [`ParseError::InputTooLarge`](crate::ParseError::InputTooLarge).
    pub max_input_bytes: usize,
    /// Name used in error locations.
    pub filename: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            filename: None,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}
