use std::fmt;
use std::sync::LazyLock;

use recon_types::{DefaultFlags, FlagSet, ReconcileError, StringFlag};
use regex::Regex;

use super::{Precheck, ScalarCore};
use crate::mapping::{MappingKind, Validate};
use crate::message;
use crate::oracle::{self, EquivalenceOracle};

/// Matches an entity or character reference starting at the beginning of the input.
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("ENTITY_REGEX is a valid regex pattern")
});

/// Collapse every run of whitespace to a single space and strip both ends.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape every `&` that does not already start an entity reference.
pub fn escape_bare_ampersands(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (idx, ch) in value.char_indices() {
        if ch == '&' && !ENTITY_REGEX.is_match(&value[idx..]) {
            escaped.push_str("&amp;");
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

#[derive(Clone, Copy)]
enum Side {
    Source,
    Destination,
}

/// Compares two strings after per-side transforms.
///
/// Each side is transformed independently, in this order: whitespace
/// normalization, trim, escaping of bare `&`. Case folding, if requested,
/// is applied to both sides last.
#[derive(Clone)]
pub struct StringMapping {
    core: ScalarCore<String>,
    flags: FlagSet<StringFlag>,
}

impl StringMapping {
    pub fn new(
        source: Option<impl Into<String>>,
        destination: Option<impl Into<String>>,
        flags: impl IntoIterator<Item = StringFlag>,
    ) -> Result<Self, ReconcileError> {
        Self::configured(source, destination, flags, &DefaultFlags::none())
    }

    pub fn configured(
        source: Option<impl Into<String>>,
        destination: Option<impl Into<String>>,
        flags: impl IntoIterator<Item = StringFlag>,
        defaults: &DefaultFlags,
    ) -> Result<Self, ReconcileError> {
        let flags = FlagSet::resolve(flags, &defaults.string)?;
        let core = ScalarCore::new(source.map(Into::into), destination.map(Into::into));
        Ok(Self { core, flags })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.core.name = name.into();
        self
    }

    pub fn with_oracle(mut self, oracle: impl EquivalenceOracle<String> + 'static) -> Self {
        self.core.set_oracle(oracle);
        self
    }

    pub fn with_oracle_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&String>, Option<&String>) -> bool + Send + Sync + 'static,
    {
        self.with_oracle(oracle::from_fn(f))
    }

    pub fn flags(&self) -> &FlagSet<StringFlag> {
        &self.flags
    }

    pub fn source(&self) -> Option<&str> {
        self.core.source.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.core.destination.as_deref()
    }

    fn transform(&self, value: &str, side: Side) -> String {
        let (normalize, trim, escape) = match side {
            Side::Source => (
                StringFlag::NormalizeSource,
                StringFlag::TrimSource,
                StringFlag::XmlEscapeSource,
            ),
            Side::Destination => (
                StringFlag::NormalizeDestination,
                StringFlag::TrimDestination,
                StringFlag::XmlEscapeDestination,
            ),
        };
        let mut out = value.to_string();
        if self.flags.contains(normalize) {
            out = normalize_whitespace(&out);
        }
        if self.flags.contains(trim) {
            out = out.trim().to_string();
        }
        if self.flags.contains(escape) {
            out = escape_bare_ampersands(&out);
        }
        out
    }
}

impl Validate for StringMapping {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn kind(&self) -> MappingKind {
        MappingKind::String
    }

    fn validate(&self) -> Option<String> {
        let (source, destination) = match self.core.precheck() {
            Precheck::Decided(true) => return None,
            Precheck::Decided(false) => return Some(self.core.raw_mismatch()),
            Precheck::Compare(s, d) => (
                self.transform(s, Side::Source),
                self.transform(d, Side::Destination),
            ),
        };
        let equal = if self.flags.contains(StringFlag::IgnoreCase) {
            source.to_lowercase() == destination.to_lowercase()
        } else {
            source == destination
        };
        if equal {
            None
        } else {
            Some(message::mismatch(source, destination))
        }
    }
}

impl fmt::Debug for StringMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringMapping")
            .field("core", &self.core)
            .field("flags", &self.flags)
            .finish()
    }
}
