// src/algorithms/engine.rs

use crate::algorithms::{Aggregates, CensoredDeprivation, WeightedDeprivation};
use crate::core::{DeprivationMatrix, EngineConfig, Matrix, Result, Scores};
use log::debug;
use ndarray::ArrayView1;
use serde::Serialize;
use std::fmt;

/// Everything the engine reports for one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PovertyProfile {
    pub cutoff: f64,
    /// d, uncensored.
    pub scores: Scores,
    pub censored: CensoredDeprivation,
    pub aggregates: Aggregates,
}

impl fmt::Display for PovertyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Poverty Profile (k = {:.4}):", self.cutoff)?;
        write!(f, "{}", self.aggregates)?;
        writeln!(
            f,
            "  Poor Persons:                 {} of {}",
            self.censored.poor_deprived_count(),
            self.censored.n_persons()
        )?;
        writeln!(f, "  Scores (first 10):")?;
        for (i, d) in self.scores.iter().take(10).enumerate() {
            // same population as the count above: poor with a positive score
            let marker = if self.censored.censored_scores()[i] > 0.0 { "poor" } else { "" };
            writeln!(f, "    Person {}: {:.4} {}", i, d, marker)?;
        }
        if self.scores.len() > 10 {
            writeln!(f, "    ...")?;
        }
        Ok(())
    }
}

/// Alkire-Foster engine over one dataset.
///
/// Stages 1 and 2 (validation, weighting) run once in `new`; each call to
/// `evaluate` only censors and aggregates, so sweeping k is cheap.
#[derive(Debug, Clone)]
pub struct AlkireFoster {
    matrix: DeprivationMatrix,
    weighted: WeightedDeprivation,
    config: EngineConfig,
}

impl AlkireFoster {
    pub fn new(matrix: DeprivationMatrix, config: Option<EngineConfig>) -> Result<Self> {
        let resolved_config = config.unwrap_or_default();
        resolved_config.validate()?;

        let matrix = if resolved_config.normalize_weights {
            matrix.normalized()
        } else {
            matrix
        };
        let parallel = resolved_config.use_parallel(matrix.n_persons());
        let weighted = WeightedDeprivation::compute_with(&matrix, parallel);

        debug!(
            "Engine ready: {} persons, {} dimensions, max score {}",
            matrix.n_persons(),
            matrix.n_dimensions(),
            matrix.total_weight()
        );

        Ok(AlkireFoster {
            matrix,
            weighted,
            config: resolved_config,
        })
    }

    pub fn matrix(&self) -> &DeprivationMatrix {
        &self.matrix
    }

    pub fn weighted(&self) -> &WeightedDeprivation {
        &self.weighted
    }

    pub fn scores(&self) -> ArrayView1<'_, f64> {
        self.weighted.scores()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Censors at `cutoff` and computes H, A and Mo.
    pub fn evaluate(&self, cutoff: f64) -> Result<PovertyProfile> {
        let parallel = self.config.use_parallel(self.matrix.n_persons());
        let censored = CensoredDeprivation::apply_with(&self.matrix, &self.weighted, cutoff, parallel)?;
        let aggregates = Aggregates::compute(&self.matrix, &censored, &self.config)?;

        Ok(PovertyProfile {
            cutoff,
            scores: self.weighted.scores().to_owned(),
            censored,
            aggregates,
        })
    }

    /// Evaluates a sweep of cutoffs against the cached scores, in order.
    pub fn evaluate_many(&self, cutoffs: &[f64]) -> Result<Vec<PovertyProfile>> {
        cutoffs.iter().map(|&k| self.evaluate(k)).collect()
    }
}

/// Runs the full pipeline once: validate, weight, censor, aggregate.
///
/// `dimensions` names the columns of `g0`; `weights` is an
/// `(Indicator, Weight)` table in any order.
pub fn aggregate<S: AsRef<str>>(
    dimensions: Vec<String>,
    g0: Matrix,
    weights: &[(S, f64)],
    cutoff: f64,
) -> Result<PovertyProfile> {
    let matrix = DeprivationMatrix::new(dimensions, g0, weights)?;
    AlkireFoster::new(matrix, None)?.evaluate(cutoff)
}
