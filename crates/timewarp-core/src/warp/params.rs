//! User-chosen transform configuration and its validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const STRETCH_MIN: i64 = -100;
pub const STRETCH_MAX: i64 = 500;
pub const SHIFT_MIN: i64 = -30;
pub const SHIFT_MAX: i64 = 30;
pub const DEFAULT_HORIZON_PAST: i64 = 30;
pub const DEFAULT_HORIZON_FUTURE: i64 = 90;

/// Parameters for one preview/commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformParameters {
    /// Percent change of spacing; -100 collapses, 0 is identity.
    pub stretch_pct: i64,
    /// Days added after stretching.
    pub shift_days: i64,
    /// Treat overdue cards as due today before stretch/shift.
    pub collapse_overdue: bool,
    pub horizon_past: i64,
    pub horizon_future: i64,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            stretch_pct: 0,
            shift_days: 0,
            collapse_overdue: false,
            horizon_past: DEFAULT_HORIZON_PAST,
            horizon_future: DEFAULT_HORIZON_FUTURE,
        }
    }
}

impl TransformParameters {
    pub fn with_stretch(mut self, stretch_pct: i64) -> Self {
        self.stretch_pct = stretch_pct;
        self
    }

    pub fn with_shift(mut self, shift_days: i64) -> Self {
        self.shift_days = shift_days;
        self
    }

    pub fn with_collapse_overdue(mut self, collapse: bool) -> Self {
        self.collapse_overdue = collapse;
        self
    }

    pub fn with_horizons(mut self, past: i64, future: i64) -> Self {
        self.horizon_past = past;
        self.horizon_future = future;
        self
    }

    /// Return stretch and shift to identity, keeping the window and overdue flag.
    pub fn reset(&mut self) {
        self.stretch_pct = 0;
        self.shift_days = 0;
    }

    /// True when the transform leaves every due date where it is.
    pub fn is_identity(&self) -> bool {
        self.stretch_pct == 0 && self.shift_days == 0 && !self.collapse_overdue
    }

    /// Total number of day offsets in the forecast window.
    pub fn window_len(&self) -> usize {
        (self.horizon_past.max(0) + self.horizon_future.max(0)) as usize
    }

    /// Check every field against its declared range.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("stretch_pct", self.stretch_pct, STRETCH_MIN, STRETCH_MAX)?;
        check_range("shift_days", self.shift_days, SHIFT_MIN, SHIFT_MAX)?;
        check_horizon("horizon_past", self.horizon_past)?;
        check_horizon("horizon_future", self.horizon_future)?;
        Ok(())
    }

    /// Validate and return self, for call chains.
    ///
    /// # Errors
    /// See [`TransformParameters::validate`].
    pub fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_horizon(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(ValidationError::NegativeHorizon { field, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity_with_standard_window() {
        let p = TransformParameters::default();
        assert!(p.is_identity());
        assert_eq!(p.horizon_past, 30);
        assert_eq!(p.horizon_future, 90);
        assert_eq!(p.window_len(), 120);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let p = TransformParameters::default().with_stretch(-100).with_shift(30);
        assert!(p.validate().is_ok());
        let p = TransformParameters::default().with_stretch(500).with_shift(-30);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn stretch_out_of_range_is_rejected() {
        let err = TransformParameters::default()
            .with_stretch(501)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "stretch_pct",
                value: 501,
                min: -100,
                max: 500
            }
        );
        assert!(TransformParameters::default().with_stretch(-101).validate().is_err());
    }

    #[test]
    fn shift_out_of_range_is_rejected() {
        assert!(TransformParameters::default().with_shift(31).validate().is_err());
        assert!(TransformParameters::default().with_shift(-31).validate().is_err());
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let err = TransformParameters::default()
            .with_horizons(-1, 90)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeHorizon { field: "horizon_past", .. }
        ));
        assert!(TransformParameters::default().with_horizons(0, 0).validate().is_ok());
    }

    #[test]
    fn reset_keeps_window_and_collapse() {
        let mut p = TransformParameters::default()
            .with_stretch(50)
            .with_shift(-3)
            .with_collapse_overdue(true)
            .with_horizons(10, 20);
        p.reset();
        assert_eq!(p.stretch_pct, 0);
        assert_eq!(p.shift_days, 0);
        assert!(p.collapse_overdue);
        assert_eq!(p.window_len(), 30);
    }
}
