//! Parser configuration

/// Default limit on parser recursion and tree height
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for the path expression parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserConfig {
    /// Maximum recursion depth and tree height before parsing fails with
    /// `NestingTooDeep`
    pub max_depth: usize,
}

impl ParserConfig {
    /// Create a configuration with default limits
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
