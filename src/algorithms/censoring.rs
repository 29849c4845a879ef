// src/algorithms/censoring.rs

use crate::algorithms::WeightedDeprivation;
use crate::core::{AfError, DeprivationMatrix, Matrix, Result, Scores};
use log::{debug, log_enabled, trace, Level};
use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::Serialize;

/// Relative slack allowed when a score meets the cutoff only up to rounding,
/// e.g. six weights of 1/6 summing to 0.9999999999999999 against k = 1.
/// The slack scales with k, so tiny weights are compared exactly.
pub const CUTOFF_TOLERANCE: f64 = 1e-12;

/// Classification of one person against the poverty cutoff k.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PovertyStatus {
    /// d ≥ k
    Poor,
    /// d < k; the person's row is censored.
    NonPoor,
}

impl PovertyStatus {
    pub fn classify(score: f64, cutoff: f64) -> Self {
        if score >= cutoff || cutoff - score <= CUTOFF_TOLERANCE * cutoff {
            PovertyStatus::Poor
        } else {
            PovertyStatus::NonPoor
        }
    }

    pub fn is_poor(self) -> bool {
        self == PovertyStatus::Poor
    }
}

/// Output of censoring g0 at one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CensoredDeprivation {
    cutoff: f64,
    statuses: Vec<PovertyStatus>,
    censored: Matrix,
    censored_scores: Scores,
    poor_count: usize,
    poor_deprived_count: usize,
}

impl CensoredDeprivation {
    /// Censors every row of g0 whose score falls below `cutoff`.
    ///
    /// `cutoff` must be finite and non-negative. Values above Σw are allowed
    /// and simply leave nobody poor.
    pub fn apply(
        matrix: &DeprivationMatrix,
        weighted: &WeightedDeprivation,
        cutoff: f64,
    ) -> Result<Self> {
        Self::apply_with(matrix, weighted, cutoff, false)
    }

    pub(crate) fn apply_with(
        matrix: &DeprivationMatrix,
        weighted: &WeightedDeprivation,
        cutoff: f64,
        parallel: bool,
    ) -> Result<Self> {
        validate_cutoff(cutoff)?;

        let scores = weighted.scores();
        if scores.len() != matrix.n_persons() {
            return Err(AfError::ShapeMismatch(format!(
                "Score vector has {} entries, but the matrix has {} persons.",
                scores.len(),
                matrix.n_persons()
            )));
        }

        let statuses = classify_all(scores, cutoff, parallel);

        let mut censored = matrix.matrix().to_owned();
        for (mut row, status) in censored.axis_iter_mut(Axis(0)).zip(&statuses) {
            if !status.is_poor() {
                row.fill(0.0);
            }
        }

        let censored_scores = Scores::from_iter(
            scores
                .iter()
                .zip(&statuses)
                .map(|(&d, status)| if status.is_poor() { d } else { 0.0 }),
        );

        let poor_count = statuses.iter().filter(|s| s.is_poor()).count();
        let poor_deprived_count = censored_scores.iter().filter(|&&c| c > 0.0).count();

        if log_enabled!(Level::Trace) {
            for (i, status) in statuses.iter().enumerate() {
                trace!("person {}: d = {}, {:?}", i, scores[i], status);
            }
        }
        debug!(
            "Censored at k = {}: {} poor ({} with positive score) of {}",
            cutoff,
            poor_count,
            poor_deprived_count,
            statuses.len()
        );

        Ok(CensoredDeprivation {
            cutoff,
            statuses,
            censored,
            censored_scores,
            poor_count,
            poor_deprived_count,
        })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn statuses(&self) -> &[PovertyStatus] {
        &self.statuses
    }

    pub fn is_poor(&self, person: usize) -> bool {
        self.statuses[person].is_poor()
    }

    /// g0 with non-poor rows zeroed.
    pub fn censored(&self) -> ArrayView2<'_, f64> {
        self.censored.view()
    }

    /// d where the person is poor, 0 otherwise.
    pub fn censored_scores(&self) -> ArrayView1<'_, f64> {
        self.censored_scores.view()
    }

    /// |{i : d[i] ≥ k}|
    pub fn poor_count(&self) -> usize {
        self.poor_count
    }

    /// |{i : d[i] ≥ k and d[i] > 0}|, the P used by H and A.
    pub fn poor_deprived_count(&self) -> usize {
        self.poor_deprived_count
    }

    pub fn n_persons(&self) -> usize {
        self.statuses.len()
    }
}

fn validate_cutoff(cutoff: f64) -> Result<()> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(AfError::InvalidValue(format!(
            "Cutoff k must be a non-negative finite number, got {}.",
            cutoff
        )));
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn classify_all(scores: ArrayView1<f64>, cutoff: f64, parallel: bool) -> Vec<PovertyStatus> {
    use rayon::prelude::*;
    match scores.as_slice() {
        Some(slice) if parallel => slice
            .par_iter()
            .map(|&d| PovertyStatus::classify(d, cutoff))
            .collect(),
        _ => scores.iter().map(|&d| PovertyStatus::classify(d, cutoff)).collect(),
    }
}

#[cfg(not(feature = "parallel"))]
fn classify_all(scores: ArrayView1<f64>, cutoff: f64, _parallel: bool) -> Vec<PovertyStatus> {
    scores.iter().map(|&d| PovertyStatus::classify(d, cutoff)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn worked_example() -> Result<(DeprivationMatrix, WeightedDeprivation)> {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let m = DeprivationMatrix::new(
            names,
            array![[1.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
            &[("a", 1.0), ("b", 1.0), ("c", 1.0)],
        )?;
        let wd = WeightedDeprivation::compute(&m);
        Ok((m, wd))
    }

    #[test]
    fn rows_below_cutoff_are_zeroed() -> Result<()> {
        let names = vec!["a".to_string(), "b".to_string()];
        let m = DeprivationMatrix::new(
            names,
            array![[1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            &[("a", 0.5), ("b", 0.5)],
        )?;
        let wd = WeightedDeprivation::compute(&m);
        let c = CensoredDeprivation::apply(&m, &wd, 0.75)?;

        assert_eq!(c.censored(), array![[1.0, 1.0], [0.0, 0.0], [0.0, 0.0]].view());
        assert_eq!(c.censored_scores(), array![1.0, 0.0, 0.0].view());
        assert_eq!(c.statuses(), &[PovertyStatus::Poor, PovertyStatus::NonPoor, PovertyStatus::NonPoor]);
        assert_eq!(c.poor_count(), 1);
        assert_eq!(c.poor_deprived_count(), 1);
        // g0 untouched
        assert_eq!(m.g0(1, 0), 1.0);
        Ok(())
    }

    #[test]
    fn score_equal_to_cutoff_is_poor() -> Result<()> {
        let (m, wd) = worked_example()?;
        let c = CensoredDeprivation::apply(&m, &wd, 2.0)?;
        assert!(c.is_poor(0));
        assert!(!c.is_poor(1));
        assert_eq!(c.censored(), m.matrix());
        Ok(())
    }

    #[test]
    fn rounding_short_of_cutoff_still_counts_as_poor() {
        let score = (0..6).fold(0.0, |acc, _| acc + 1.0 / 6.0);
        assert!(score < 1.0);
        assert_eq!(PovertyStatus::classify(score, 1.0), PovertyStatus::Poor);
        assert_eq!(PovertyStatus::classify(0.99, 1.0), PovertyStatus::NonPoor);
    }

    #[test]
    fn tiny_weights_are_classified_without_slack() -> Result<()> {
        let names = vec!["a".to_string(), "b".to_string()];
        let m = DeprivationMatrix::new(
            names,
            array![[1.0, 0.0], [1.0, 1.0]],
            &[("a", 1e-12), ("b", 1e-12)],
        )?;
        let wd = WeightedDeprivation::compute(&m);
        let c = CensoredDeprivation::apply(&m, &wd, 2e-12)?;
        assert!(!c.is_poor(0));
        assert!(c.is_poor(1));
        assert_eq!(c.censored(), array![[0.0, 0.0], [1.0, 1.0]].view());
        Ok(())
    }

    #[test]
    fn positive_cutoff_below_rounding_scale_censors_zero_scores() -> Result<()> {
        let names = vec!["a".to_string()];
        let m = DeprivationMatrix::new(names, array![[0.0], [1.0]], &[("a", 1.0)])?;
        let wd = WeightedDeprivation::compute(&m);
        let c = CensoredDeprivation::apply(&m, &wd, 1e-13)?;
        assert_eq!(c.poor_count(), 1);
        assert_eq!(c.statuses(), &[PovertyStatus::NonPoor, PovertyStatus::Poor]);
        Ok(())
    }

    #[test]
    fn zero_cutoff_separates_the_two_counts() -> Result<()> {
        let (m, wd) = worked_example()?;
        let c = CensoredDeprivation::apply(&m, &wd, 0.0)?;
        // everyone satisfies d >= 0, only person 0 has d > 0
        assert_eq!(c.poor_count(), 2);
        assert_eq!(c.poor_deprived_count(), 1);
        Ok(())
    }

    #[test]
    fn cutoff_above_total_weight_leaves_nobody_poor() -> Result<()> {
        let (m, wd) = worked_example()?;
        let c = CensoredDeprivation::apply(&m, &wd, m.total_weight() + 1.0)?;
        assert_eq!(c.poor_count(), 0);
        assert_eq!(c.poor_deprived_count(), 0);
        assert!(c.censored().iter().all(|&x| x == 0.0));
        Ok(())
    }

    #[test]
    fn invalid_cutoffs_are_rejected() -> Result<()> {
        let (m, wd) = worked_example()?;
        for k in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                CensoredDeprivation::apply(&m, &wd, k),
                Err(AfError::InvalidValue(_))
            ));
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_classification_matches_sequential() -> Result<()> {
        let (m, wd) = worked_example()?;
        let sequential = CensoredDeprivation::apply_with(&m, &wd, 1.0, false)?;
        let parallel = CensoredDeprivation::apply_with(&m, &wd, 1.0, true)?;
        assert_eq!(sequential, parallel);
        Ok(())
    }
}
