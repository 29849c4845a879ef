// src/traits.rs

use crate::core::{RawValue, Result};

/// Maps one raw observation of a dimension to a deprivation bit.
///
/// Implementors decide whether a person is deprived in a single dimension
/// given the value recorded for that person. The result feeds g0, so the
/// rest of the pipeline only ever sees 0/1 cells.
pub trait DeprivationRule {
    /// Returns `true` if `value` counts as deprived under this rule.
    ///
    /// Fails with `AfError::InvalidValue` when the kind of `value` cannot be
    /// judged by the rule (e.g. a category label against a numeric threshold).
    fn is_deprived(&self, value: &RawValue) -> Result<bool>;
}

impl<R: DeprivationRule + ?Sized> DeprivationRule for &R {
    fn is_deprived(&self, value: &RawValue) -> Result<bool> {
        (**self).is_deprived(value)
    }
}

impl<R: DeprivationRule + ?Sized> DeprivationRule for Box<R> {
    fn is_deprived(&self, value: &RawValue) -> Result<bool> {
        (**self).is_deprived(value)
    }
}
