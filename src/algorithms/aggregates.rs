// src/algorithms/aggregates.rs

use crate::algorithms::CensoredDeprivation;
use crate::core::{AfError, DegeneratePolicy, DeprivationMatrix, EngineConfig, Result};
use crate::utils::{ratio_or_zero, sequential_sum, within_relative};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

/// The three Alkire-Foster summary statistics at one cutoff.
///
/// `headcount_ratio` is a percentage in [0, 100]; `intensity` and
/// `adjusted_headcount_ratio` are fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregates {
    /// H = 100 * P / N
    pub headcount_ratio: f64,
    /// A = Σ censored / (M * P), 0 when P = 0
    pub intensity: f64,
    /// Mo = Σ censored / (N * M)
    pub adjusted_headcount_ratio: f64,
}

impl Aggregates {
    /// All-zero aggregates, reported for an empty population.
    pub fn zero() -> Self {
        Aggregates {
            headcount_ratio: 0.0,
            intensity: 0.0,
            adjusted_headcount_ratio: 0.0,
        }
    }

    /// Computes H, A and Mo from g0's shape and the censored stage output.
    ///
    /// Mo is the mean of the censored matrix. H/100 * A is only computed as a
    /// cross-check and logged if it drifts beyond the configured tolerance.
    ///
    /// P is the number of poor persons with a positive score; H uses it as
    /// its numerator so that Mo == H/100 * A holds at every cutoff.
    pub fn compute(
        matrix: &DeprivationMatrix,
        censored: &CensoredDeprivation,
        config: &EngineConfig,
    ) -> Result<Self> {
        let n = censored.n_persons();
        let m = matrix.n_dimensions();

        if n == 0 {
            return match config.degenerate {
                DegeneratePolicy::Zero => {
                    debug!("Empty population; reporting zero aggregates");
                    Ok(Aggregates::zero())
                }
                DegeneratePolicy::Error => Err(AfError::EmptyPopulation(
                    "Cannot compute aggregates for a population of 0 persons.".to_string(),
                )),
            };
        }

        let p = censored.poor_deprived_count();
        let censored_total = censored
            .censored()
            .rows()
            .into_iter()
            .map(sequential_sum)
            .fold(0.0, |acc, row| acc + row);

        let headcount_ratio = 100.0 * (p as f64 / n as f64);
        let intensity = ratio_or_zero(censored_total, (m * p) as f64);
        let adjusted_headcount_ratio = censored_total / (n * m) as f64;

        let aggregates = Aggregates {
            headcount_ratio,
            intensity,
            adjusted_headcount_ratio,
        };

        if p > 0 {
            let product = aggregates.product_of_parts();
            if !within_relative(product, adjusted_headcount_ratio, config.cross_check_tolerance) {
                warn!(
                    "Mo cross-check drifted at k = {}: mean(censored) = {}, H/100 * A = {}",
                    censored.cutoff(),
                    adjusted_headcount_ratio,
                    product
                );
            }
        }

        debug!(
            "Aggregates at k = {}: H = {}, A = {}, Mo = {}",
            censored.cutoff(),
            headcount_ratio,
            intensity,
            adjusted_headcount_ratio
        );

        Ok(aggregates)
    }

    /// H/100 * A, the textbook definition of Mo.
    pub fn product_of_parts(&self) -> f64 {
        self.headcount_ratio / 100.0 * self.intensity
    }
}

impl fmt::Display for Aggregates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Headcount Ratio (H):          {:.2}%", self.headcount_ratio)?;
        writeln!(f, "  Intensity (A):                {:.4}", self.intensity)?;
        writeln!(f, "  Adjusted Headcount (Mo):      {:.4}", self.adjusted_headcount_ratio)
    }
}
