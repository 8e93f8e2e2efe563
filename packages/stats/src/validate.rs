//! Input validation for admin writes.
//!
//! Every check here runs before any store call. Errors name the field that
//! failed so callers can show a precise (but generic) message.

use arrest_map_region::{canonicalize, sanitize};
use arrest_map_region_models::Region;
use arrest_map_stats_models::MAX_COUNT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of region updates in one batch write.
pub const MAX_BATCH_SIZE: usize = 50;

/// One of the two counted quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    /// Arrests.
    Arrests,
    /// First Information Reports.
    Fir,
}

impl std::fmt::Display for CountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arrests => write!(f, "arrest count"),
            Self::Fir => write!(f, "FIR count"),
        }
    }
}

/// Which input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The region name.
    Region,
    /// The arrest count.
    ArrestCount,
    /// The FIR count.
    FirCount,
    /// The batch as a whole.
    Batch,
    /// A media item field.
    Media,
}

/// A rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The region name does not resolve to a known region.
    #[error("Invalid region name: {input}")]
    Region {
        /// Sanitized copy of the rejected name.
        input: String,
    },

    /// A count is not an integer in `0..=999999`.
    #[error("Invalid {field} for {region}")]
    Count {
        /// Which count.
        field: CountField,
        /// Sanitized region name the count was given for.
        region: String,
    },

    /// An additive update would push a total past the maximum.
    #[error("Total {field} for {region} exceeds maximum")]
    TotalExceedsMaximum {
        /// Which count.
        field: CountField,
        /// The region whose total overflowed.
        region: Region,
    },

    /// The batch is empty.
    #[error("Invalid updates")]
    EmptyBatch,

    /// The batch exceeds [`MAX_BATCH_SIZE`].
    #[error("Maximum {} updates per batch", MAX_BATCH_SIZE)]
    BatchTooLarge {
        /// Number of updates submitted.
        len: usize,
    },

    /// A required media field is missing or blank.
    #[error("Missing required fields")]
    MissingFields,

    /// The media link is not an `http(s)` URL.
    #[error("Invalid link")]
    InvalidUrl,

    /// The media id is blank.
    #[error("Invalid media ID")]
    InvalidMediaId,
}

impl ValidationError {
    /// Returns the input that failed.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Region { .. } => Field::Region,
            Self::Count { field, .. } | Self::TotalExceedsMaximum { field, .. } => match field {
                CountField::Arrests => Field::ArrestCount,
                CountField::Fir => Field::FirCount,
            },
            Self::EmptyBatch | Self::BatchTooLarge { .. } => Field::Batch,
            Self::MissingFields | Self::InvalidUrl | Self::InvalidMediaId => Field::Media,
        }
    }
}

/// A count as it arrives from a form or JSON body: a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    /// An integral JSON number.
    Integer(i64),
    /// A JSON number with a fractional part or exponent.
    Float(f64),
    /// Text, parsed as a base-10 integer.
    Text(String),
}

impl From<u32> for CountValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for CountValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Parses a count, returning `None` unless it is an integer in
/// `0..=MAX_COUNT`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(value: &CountValue) -> Option<u32> {
    let n = match value {
        CountValue::Integer(n) => *n,
        CountValue::Float(f) => {
            if !f.is_finite() || f.fract() != 0.0 || *f < 0.0 || *f > f64::from(MAX_COUNT) {
                return None;
            }
            return Some(*f as u32);
        }
        CountValue::Text(s) => s.trim().parse::<i64>().ok()?,
    };

    u32::try_from(n).ok().filter(|n| *n <= MAX_COUNT)
}

/// Returns `true` if `value` is a valid count.
#[must_use]
pub fn is_valid_count(value: &CountValue) -> bool {
    parse_count(value).is_some()
}

/// Resolves a region name or reports it as invalid.
///
/// # Errors
///
/// Returns [`ValidationError::Region`] if the name is unknown.
pub fn require_region(name: &str) -> Result<Region, ValidationError> {
    canonicalize(name).ok_or_else(|| ValidationError::Region {
        input: sanitize(name),
    })
}

/// A fully validated single-region update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedUpdate {
    /// Canonical region.
    pub region: Region,
    /// Arrest count to write (or add).
    pub arrests: u32,
    /// FIR count to write (or add).
    pub fir: u32,
}

/// Validates region, arrest count and FIR count, in that order.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_update(
    region: &str,
    arrests: &CountValue,
    fir: &CountValue,
) -> Result<ValidatedUpdate, ValidationError> {
    let resolved = require_region(region)?;
    let count_error = |field| ValidationError::Count {
        field,
        region: sanitize(region),
    };

    let arrests = parse_count(arrests).ok_or_else(|| count_error(CountField::Arrests))?;
    let fir = parse_count(fir).ok_or_else(|| count_error(CountField::Fir))?;

    Ok(ValidatedUpdate {
        region: resolved,
        arrests,
        fir,
    })
}

/// One unvalidated entry of a batch write.
///
/// Older clients send `state` and `count`; those read as the region and
/// arrest count with a FIR count of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    /// Free-text region name.
    #[serde(alias = "state")]
    pub region: String,
    /// Arrest count.
    #[serde(alias = "count")]
    pub arrests: CountValue,
    /// FIR count.
    #[serde(default = "zero_count")]
    pub fir: CountValue,
}

const fn zero_count() -> CountValue {
    CountValue::Integer(0)
}

impl RecordUpdate {
    /// Validates this entry.
    ///
    /// # Errors
    ///
    /// See [`validate_update`].
    pub fn validate(&self) -> Result<ValidatedUpdate, ValidationError> {
        validate_update(&self.region, &self.arrests, &self.fir)
    }
}

/// Checks the size of a batch before anything else is looked at.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyBatch`] or
/// [`ValidationError::BatchTooLarge`].
pub const fn validate_batch_len(len: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::EmptyBatch);
    }
    if len > MAX_BATCH_SIZE {
        return Err(ValidationError::BatchTooLarge { len });
    }
    Ok(())
}

/// Adds `delta` to an existing total, rejecting results above the maximum.
///
/// # Errors
///
/// Returns [`ValidationError::TotalExceedsMaximum`] instead of clamping.
pub fn checked_total(
    existing: u64,
    delta: u32,
    field: CountField,
    region: Region,
) -> Result<u32, ValidationError> {
    existing
        .checked_add(u64::from(delta))
        .and_then(|total| u32::try_from(total).ok())
        .filter(|total| *total <= MAX_COUNT)
        .ok_or(ValidationError::TotalExceedsMaximum { field, region })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_counts_in_range() {
        assert_eq!(parse_count(&CountValue::Integer(0)), Some(0));
        assert_eq!(parse_count(&CountValue::Integer(999_999)), Some(999_999));
        assert_eq!(parse_count(&CountValue::Float(42.0)), Some(42));
        assert_eq!(parse_count(&"17".into()), Some(17));
        assert_eq!(parse_count(&" 17 ".into()), Some(17));
    }

    #[test]
    fn rejects_out_of_range_fractional_and_garbage() {
        assert!(!is_valid_count(&CountValue::Integer(-1)));
        assert!(!is_valid_count(&CountValue::Integer(1_000_000)));
        assert!(!is_valid_count(&CountValue::Float(3.5)));
        assert!(!is_valid_count(&CountValue::Float(f64::NAN)));
        assert!(!is_valid_count(&CountValue::Float(f64::INFINITY)));
        assert!(!is_valid_count(&CountValue::Float(-0.5)));
        assert!(!is_valid_count(&"abc".into()));
        assert!(!is_valid_count(&"3.5".into()));
        assert!(!is_valid_count(&"-1".into()));
        assert!(!is_valid_count(&"".into()));
    }

    #[test]
    fn count_value_deserializes_numbers_and_strings() {
        let values: Vec<CountValue> = serde_json::from_str(r#"[5, 3.5, "7", -1]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CountValue::Integer(5),
                CountValue::Float(3.5),
                CountValue::Text("7".to_string()),
                CountValue::Integer(-1),
            ]
        );
    }

    #[test]
    fn update_validation_names_the_failing_field() {
        let err = validate_update("atlantis", &1u32.into(), &1u32.into()).unwrap_err();
        assert_eq!(err.field(), Field::Region);

        let err = validate_update("goa", &"x".into(), &1u32.into()).unwrap_err();
        assert_eq!(err.field(), Field::ArrestCount);
        assert_eq!(err.to_string(), "Invalid arrest count for goa");

        let err = validate_update("goa", &1u32.into(), &CountValue::Integer(-4)).unwrap_err();
        assert_eq!(err.field(), Field::FirCount);
    }

    #[test]
    fn update_validation_canonicalizes() {
        let update = validate_update("Orissa", &"12".into(), &3u32.into()).unwrap();
        assert_eq!(
            update,
            ValidatedUpdate {
                region: Region::Odisha,
                arrests: 12,
                fir: 3,
            }
        );
    }

    #[test]
    fn region_error_echoes_sanitized_input() {
        let err = require_region("<b>nowhere</b>").unwrap_err();
        assert_eq!(err.to_string(), "Invalid region name: bnowhere/b");
    }

    #[test]
    fn record_update_reads_legacy_fields() {
        let update: RecordUpdate =
            serde_json::from_str(r#"{ "state": "Kerala", "count": "9" }"#).unwrap();
        assert_eq!(
            update.validate().unwrap(),
            ValidatedUpdate {
                region: Region::Kerala,
                arrests: 9,
                fir: 0,
            }
        );

        let update: RecordUpdate =
            serde_json::from_str(r#"{ "region": "goa", "arrests": 1, "fir": 2 }"#).unwrap();
        assert_eq!(update.validate().unwrap().fir, 2);
    }

    #[test]
    fn batch_size_limits() {
        assert_eq!(validate_batch_len(0), Err(ValidationError::EmptyBatch));
        assert!(validate_batch_len(1).is_ok());
        assert!(validate_batch_len(MAX_BATCH_SIZE).is_ok());
        assert_eq!(
            validate_batch_len(51),
            Err(ValidationError::BatchTooLarge { len: 51 })
        );
        assert_eq!(
            ValidationError::BatchTooLarge { len: 51 }.to_string(),
            "Maximum 50 updates per batch"
        );
    }

    #[test]
    fn additive_totals_are_rejected_not_clamped() {
        assert_eq!(
            checked_total(999_000, 999, CountField::Arrests, Region::Goa),
            Ok(999_999)
        );
        let err = checked_total(999_000, 1_000, CountField::Fir, Region::Goa).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TotalExceedsMaximum {
                field: CountField::Fir,
                region: Region::Goa,
            }
        );
        assert_eq!(err.to_string(), "Total FIR count for goa exceeds maximum");
        assert!(checked_total(u64::MAX, 1, CountField::Arrests, Region::Goa).is_err());
    }
}
