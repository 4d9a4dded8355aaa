//! # Dialect Table
//!
//! The fixed, process-wide set of schema dialects this harness accepts.
//! A dialect maps to a validator-construction strategy (see
//! `harness-schema`) and to a default policy for whether `format`
//! assertions are enforced.
//!
//! Draft 2020-12 treats `format` as an annotation by default, so format
//! assertions are off for it. Every older draft in the table asserts
//! formats by default.

use serde::Serialize;

/// A supported schema dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Dialect {
    /// JSON Schema 2020-12.
    Draft202012,
    /// JSON Schema 2019-09.
    Draft201909,
    /// JSON Schema draft 7.
    Draft7,
    /// JSON Schema draft 6.
    Draft6,
    /// JSON Schema draft 4.
    Draft4,
}

impl Dialect {
    /// Every supported dialect, newest first. This is the order announced
    /// in the `start` acknowledgment.
    pub const ALL: [Dialect; 5] = [
        Dialect::Draft202012,
        Dialect::Draft201909,
        Dialect::Draft7,
        Dialect::Draft6,
        Dialect::Draft4,
    ];

    /// The dialect's meta-schema URI, exactly as it appears on the wire.
    pub fn uri(self) -> &'static str {
        match self {
            Dialect::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
            Dialect::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Dialect::Draft7 => "http://json-schema.org/draft-07/schema#",
            Dialect::Draft6 => "http://json-schema.org/draft-06/schema#",
            Dialect::Draft4 => "http://json-schema.org/draft-04/schema#",
        }
    }

    /// Look up a dialect by its wire URI. Matching is exact.
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.uri() == uri)
    }

    /// Whether `format` is asserted by default under this dialect.
    pub fn validates_formats(self) -> bool {
        !matches!(self, Dialect::Draft202012)
    }

    /// Short human-readable name, for logs.
    pub fn short_name(self) -> &'static str {
        match self {
            Dialect::Draft202012 => "draft2020-12",
            Dialect::Draft201909 => "draft2019-09",
            Dialect::Draft7 => "draft7",
            Dialect::Draft6 => "draft6",
            Dialect::Draft4 => "draft4",
        }
    }
}

impl From<Dialect> for &'static str {
    fn from(dialect: Dialect) -> Self {
        dialect.uri()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}
