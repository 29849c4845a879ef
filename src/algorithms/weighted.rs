// src/algorithms/weighted.rs

use crate::core::{DeprivationMatrix, Matrix, Scores};
use crate::utils::sequential_sum;
use log::debug;
use ndarray::{ArrayView1, ArrayView2, Axis};

/// gprime0 and the score vector d for one (g0, w) pair.
///
/// Depends only on the dataset, never on the cutoff, so it is computed once
/// and reused for every k.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDeprivation {
    weighted: Matrix,
    scores: Scores,
}

impl WeightedDeprivation {
    /// gprime0[i][j] = g0[i][j] * w[j]; d[i] = Σ_j gprime0[i][j], summed left to right.
    pub fn compute(matrix: &DeprivationMatrix) -> Self {
        Self::compute_with(matrix, false)
    }

    pub(crate) fn compute_with(matrix: &DeprivationMatrix, parallel: bool) -> Self {
        let weighted = &matrix.matrix() * &matrix.weights().insert_axis(Axis(0));
        let scores = if parallel {
            Self::row_sums_parallel(weighted.view())
        } else {
            Scores::from_iter(weighted.rows().into_iter().map(sequential_sum))
        };

        debug!(
            "Weighted deprivation computed for {} persons (parallel: {})",
            scores.len(),
            parallel
        );

        WeightedDeprivation { weighted, scores }
    }

    #[cfg(feature = "parallel")]
    fn row_sums_parallel(weighted: ArrayView2<f64>) -> Scores {
        use ndarray::parallel::prelude::*;
        let sums: Vec<f64> = weighted
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(sequential_sum)
            .collect();
        Scores::from_vec(sums)
    }

    #[cfg(not(feature = "parallel"))]
    fn row_sums_parallel(weighted: ArrayView2<f64>) -> Scores {
        Scores::from_iter(weighted.rows().into_iter().map(sequential_sum))
    }

    /// gprime0
    pub fn weighted(&self) -> ArrayView2<'_, f64> {
        self.weighted.view()
    }

    /// d
    pub fn scores(&self) -> ArrayView1<'_, f64> {
        self.scores.view()
    }

    pub fn score(&self, person: usize) -> f64 {
        self.scores[person]
    }

    /// Persons with any weighted deprivation at all (d > 0), ignoring k.
    pub fn deprived_count(&self) -> usize {
        self.scores.iter().filter(|&&d| d > 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Result;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Uniform};

    fn matrix(g0: Matrix, weights: &[f64]) -> Result<DeprivationMatrix> {
        let names: Vec<String> = (0..g0.ncols()).map(|j| format!("d{}", j)).collect();
        let table: Vec<(String, f64)> = names.iter().cloned().zip(weights.iter().copied()).collect();
        DeprivationMatrix::new(names, g0, &table)
    }

    #[test]
    fn scores_are_row_sums_of_weighted_matrix() -> Result<()> {
        let m = matrix(array![[1.0, 0.0, 1.0], [0.0, 0.0, 0.0]], &[1.0, 1.0, 1.0])?;
        let wd = WeightedDeprivation::compute(&m);
        assert_eq!(wd.weighted(), array![[1.0, 0.0, 1.0], [0.0, 0.0, 0.0]].view());
        assert_eq!(wd.scores(), array![2.0, 0.0].view());
        assert_eq!(wd.deprived_count(), 1);
        Ok(())
    }

    #[test]
    fn fractional_weights_scale_columns() -> Result<()> {
        let m = matrix(array![[1.0, 1.0, 0.0], [0.0, 1.0, 1.0]], &[0.5, 0.25, 0.25])?;
        let wd = WeightedDeprivation::compute(&m);
        assert_eq!(wd.weighted(), array![[0.5, 0.25, 0.0], [0.0, 0.25, 0.25]].view());
        assert_eq!(wd.score(0), 0.75);
        assert_eq!(wd.score(1), 0.5);
        Ok(())
    }

    #[test]
    fn formula_holds_cell_by_cell_on_random_input() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let weight_dist = Uniform::new(0.0, 1.0);
        for _ in 0..20 {
            let (n, m_dims) = (rng.gen_range(1..30), rng.gen_range(1..8));
            let g0 = Matrix::from_shape_fn((n, m_dims), |_| if rng.gen_bool(0.4) { 1.0 } else { 0.0 });
            let mut weights: Vec<f64> = (0..m_dims).map(|_| weight_dist.sample(&mut rng)).collect();
            weights[0] += 0.1;
            let m = matrix(g0, &weights)?;
            let wd = WeightedDeprivation::compute(&m);

            for i in 0..n {
                let mut expected = 0.0;
                for j in 0..m_dims {
                    let cell = m.g0(i, j) * m.weight(j);
                    assert_eq!(wd.weighted()[[i, j]], cell);
                    expected += cell;
                }
                assert_eq!(wd.score(i).to_bits(), expected.to_bits());
            }
        }
        Ok(())
    }

    #[test]
    fn uniform_weights_give_unit_score_when_fully_deprived() -> Result<()> {
        let m = matrix(Matrix::ones((4, 6)), &[1.0 / 6.0; 6])?;
        let wd = WeightedDeprivation::compute(&m);
        for &d in wd.scores().iter() {
            assert_relative_eq!(d, 1.0, max_relative = 1e-12);
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_path_is_bit_identical() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let g0 = Matrix::from_shape_fn((500, 9), |_| if rng.gen_bool(0.5) { 1.0 } else { 0.0 });
        let m = matrix(g0, &[1.0 / 9.0; 9])?;
        let sequential = WeightedDeprivation::compute_with(&m, false);
        let parallel = WeightedDeprivation::compute_with(&m, true);
        assert_eq!(sequential, parallel);
        Ok(())
    }
}
