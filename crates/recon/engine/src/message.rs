//! Fixed diff message formats.
//!
//! Report consumers parse these strings; the layout must not change.

use std::fmt::Display;

pub const MISMATCH_HEADER: &str = "Source does not Equal Destination!";

/// The scalar mismatch message.
pub fn mismatch(source: impl Display, destination: impl Display) -> String {
    format!(
        "{}\n\tSource      : {}\n\tDestination : {}",
        MISMATCH_HEADER, source, destination
    )
}

/// Two-line diff for a mismatched position in an ordered comparison.
pub fn position_mismatch(index: usize, source: impl Display, destination: impl Display) -> String {
    format!(
        "\tSource      [{}] : {}\n\tDestination [{}] : {}",
        index, source, index, destination
    )
}

pub fn missing_from_destination(source: impl Display) -> String {
    format!("Source entry not found in Destination: {}", source)
}

pub fn missing_from_source(destination: impl Display) -> String {
    format!("Destination entry not found in Source: {}", destination)
}

/// Default mapping name for a pair of scalar values.
pub fn scalar_name(source: impl Display, destination: impl Display) -> String {
    format!("'{}' -> '{}'", source, destination)
}
