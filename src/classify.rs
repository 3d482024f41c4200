//! Healthy-range classification.
//!
//! Maps a recorded value to one of five ordinal categories using the
//! element's reference bounds. An element with no reference row, or with any
//! bound missing, classifies as `NotApplicable` ("N/A") rather than erroring;
//! `classify_strict` is the variant that treats a missing range as an error.

use crate::store::{ReadingStore, ReferenceRange, StoreError};
use serde::{Deserialize, Serialize};

/// Ordinal health-range category for one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeCategory {
    BelowCritical,
    BelowHealthy,
    WithinHealthy,
    AboveHealthy,
    AboveCritical,
    /// No reference row, or at least one bound undefined
    NotApplicable,
}

impl RangeCategory {
    /// Parenthesized annotation for inline display next to a value,
    /// e.g. `"(within healthy range)"`. `NotApplicable` stays bare.
    pub fn annotation(&self) -> String {
        match self {
            RangeCategory::NotApplicable => self.to_string(),
            _ => format!("({self})"),
        }
    }
}

impl std::fmt::Display for RangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RangeCategory::BelowCritical => "below critical range",
            RangeCategory::BelowHealthy => "below healthy range",
            RangeCategory::WithinHealthy => "within healthy range",
            RangeCategory::AboveHealthy => "above healthy range",
            RangeCategory::AboveCritical => "above critical range",
            RangeCategory::NotApplicable => "N/A",
        };
        f.write_str(s)
    }
}

/// Classify a value against a (possibly missing or incomplete) range.
///
/// Checks are ordered; the first match wins.
pub fn classify_value(range: Option<&ReferenceRange>, value: f64) -> RangeCategory {
    let Some(range) = range else {
        return RangeCategory::NotApplicable;
    };
    let (Some(lower_critical), Some(lower), Some(upper), Some(upper_critical)) = (
        range.lower_critical_limit,
        range.lower_limit,
        range.upper_limit,
        range.upper_critical_limit,
    ) else {
        return RangeCategory::NotApplicable;
    };

    if value < lower_critical {
        RangeCategory::BelowCritical
    } else if value < lower {
        RangeCategory::BelowHealthy
    } else if value <= upper {
        RangeCategory::WithinHealthy
    } else if value <= upper_critical {
        RangeCategory::AboveHealthy
    } else {
        RangeCategory::AboveCritical
    }
}

/// Classify by looking the element's bounds up in the store.
pub fn classify<S: ReadingStore>(
    store: &S,
    element_name: &str,
    value: f64,
) -> Result<RangeCategory, StoreError> {
    let range = store.reference_range(element_name)?;
    Ok(classify_value(range.as_ref(), value))
}

/// Like [`classify`], but a missing or incomplete reference range is an
/// error instead of the `"N/A"` sentinel.
pub fn classify_strict<S: ReadingStore>(
    store: &S,
    element_name: &str,
    value: f64,
) -> Result<RangeCategory, ClassifyError> {
    match classify(store, element_name, value)? {
        RangeCategory::NotApplicable => {
            Err(ClassifyError::UnknownElement(element_name.to_string()))
        }
        category => Ok(category),
    }
}

/// Classification failures (strict mode only).
#[derive(Debug)]
pub enum ClassifyError {
    /// No usable reference range for the element
    UnknownElement(String),
    Store(StoreError),
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::UnknownElement(name) => {
                write!(f, "no reference range for element {name:?}")
            }
            ClassifyError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

impl From<StoreError> for ClassifyError {
    fn from(e: StoreError) -> Self {
        ClassifyError::Store(e)
    }
}
