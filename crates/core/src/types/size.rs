//! Shoe size type.
//!
//! Sizes are a closed set of US footwear sizes. The backend stores them as
//! strings ("7", "10.5"), so the wrapper keeps the canonical string form and
//! validates on parse.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShoeSize`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SizeError {
    /// The input string is empty.
    #[error("size cannot be empty")]
    Empty,
    /// The input is not a recognized size.
    #[error("unrecognized shoe size: {0}")]
    Unrecognized(String),
}

/// Smallest stocked US size.
const MIN_SIZE: u32 = 4;
/// Largest stocked US size.
const MAX_SIZE: u32 = 15;

/// A US shoe size, whole or half ("4" through "15", "4.5" through "14.5").
///
/// ## Examples
///
/// ```
/// use sole_trader_core::ShoeSize;
///
/// assert!(ShoeSize::parse("10").is_ok());
/// assert!(ShoeSize::parse("10.5").is_ok());
/// assert!(ShoeSize::parse("3").is_err());    // below range
/// assert!(ShoeSize::parse("10.25").is_err()); // quarter sizes don't exist
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShoeSize(String);

impl ShoeSize {
    /// Parse a `ShoeSize` from a string.
    ///
    /// Accepts whole sizes and half sizes within the stocked range. The
    /// stored form is normalized ("10.0" becomes "10").
    ///
    /// # Errors
    ///
    /// Returns [`SizeError`] if the input is empty or not a stocked size.
    pub fn parse(s: &str) -> Result<Self, SizeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SizeError::Empty);
        }

        let (whole, half) = match trimmed.split_once('.') {
            None => (trimmed, false),
            Some((whole, "5")) => (whole, true),
            Some((whole, "0")) => (whole, false),
            Some(_) => return Err(SizeError::Unrecognized(s.to_owned())),
        };

        let whole: u32 = whole
            .parse()
            .map_err(|_| SizeError::Unrecognized(s.to_owned()))?;

        let in_range = if half {
            (MIN_SIZE..MAX_SIZE).contains(&whole)
        } else {
            (MIN_SIZE..=MAX_SIZE).contains(&whole)
        };
        if !in_range {
            return Err(SizeError::Unrecognized(s.to_owned()));
        }

        let canonical = if half {
            format!("{whole}.5")
        } else {
            whole.to_string()
        };
        Ok(Self(canonical))
    }

    /// Returns the size as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All stocked sizes, smallest first.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut sizes = Vec::new();
        for whole in MIN_SIZE..=MAX_SIZE {
            sizes.push(Self(whole.to_string()));
            if whole < MAX_SIZE {
                sizes.push(Self(format!("{whole}.5")));
            }
        }
        sizes
    }
}

impl fmt::Display for ShoeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShoeSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShoeSize {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
