//! Caller-supplied knobs for [`crate::parser::EventStreamParser`].

use regex::Regex;

use crate::symbol_index::SymbolIndex;

/// Default value of [`ParserConfig::max_samples`], matching the distilled
/// spec's documented default.
pub const DEFAULT_MAX_SAMPLES: u64 = 50_000;

/// Construction-time configuration for an [`crate::parser::EventStreamParser`].
///
/// Bundles the parser's three knobs (symbol archive, event-name filter,
/// sample cap) into one struct passed to the parser's constructor,
/// the way `samply`'s `ConversionProps` bundles CLI-adjacent settings for
/// `Converter::new` rather than exposing a sequence of setters.
#[derive(Debug, Default)]
pub struct ParserConfig {
    pub(crate) symbol_index: Option<SymbolIndex>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) max_samples: Option<u64>,
}

impl ParserConfig {
    pub fn new() -> Self {
        ParserConfig::default()
    }

    /// Installs a [`SymbolIndex`] to resolve frames whose module or symbol
    /// comes out of the text as `unknown`.
    pub fn with_symbol_archive(mut self, index: SymbolIndex) -> Self {
        self.symbol_index = Some(index);
        self
    }

    /// Restricts emitted events to those whose `event_name` matches `pattern`.
    /// A config with no pattern matches every event.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets the cap on emitted sample count. Defaults to
    /// [`DEFAULT_MAX_SAMPLES`] when unset.
    pub fn with_max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub(crate) fn max_samples_or_default(&self) -> u64 {
        self.max_samples.unwrap_or(DEFAULT_MAX_SAMPLES)
    }
}
