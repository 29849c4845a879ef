// src/core/data.rs
use crate::core::{AfError, IndicatorRule, RawValue, Result};
use crate::traits::DeprivationRule;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashMap;

/// A persons × dimensions matrix. Rows are persons in input order.
pub type Matrix = Array2<f64>;

/// One value per person (deprivation scores, censored scores).
pub type Scores = Array1<f64>;

/// Validated deprivation matrix g0 together with its weight vector w.
///
/// Construction is the only place input is checked; every later stage
/// assumes the invariants below and never re-validates:
/// - every cell is exactly 0 or 1,
/// - dimension names are unique and match the weight table one-to-one,
/// - weights are finite, non-negative, and not all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DeprivationMatrix {
    dimensions: Vec<String>,
    g0: Matrix,
    weights: Array1<f64>,
}

impl DeprivationMatrix {
    /// Validates `g0` against a weight table of `(Indicator, Weight)` pairs.
    ///
    /// `dimensions` names the columns of `g0` in order. The weight table may
    /// list indicators in any order; weights are realigned to column order.
    pub fn new<S: AsRef<str>>(
        dimensions: Vec<String>,
        g0: Matrix,
        weights: &[(S, f64)],
    ) -> Result<Self> {
        if g0.ncols() != dimensions.len() {
            return Err(AfError::ShapeMismatch(format!(
                "Matrix has {} columns, but {} dimension names were given.",
                g0.ncols(),
                dimensions.len()
            )));
        }

        let aligned = align_by_name(&dimensions, weights, "weight")?;
        let weights = Array1::from_vec(aligned.into_iter().copied().collect());
        validate_weights(&dimensions, weights.view())?;
        validate_cells(&dimensions, g0.view())?;

        debug!(
            "Loaded deprivation matrix: {} persons x {} dimensions, total weight {}",
            g0.nrows(),
            g0.ncols(),
            weights.iter().fold(0.0, |acc, &w| acc + w)
        );

        Ok(DeprivationMatrix {
            dimensions,
            g0,
            weights,
        })
    }

    /// Same as [`DeprivationMatrix::new`], from one `Vec` per person.
    pub fn from_rows<S: AsRef<str>>(
        dimensions: Vec<String>,
        rows: &[Vec<f64>],
        weights: &[(S, f64)],
    ) -> Result<Self> {
        let m = dimensions.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != m) {
            return Err(AfError::ShapeMismatch(format!(
                "Person {} has {} entries, expected {}.",
                i,
                row.len(),
                m
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let g0 = Matrix::from_shape_vec((rows.len(), m), flat)?;
        Self::new(dimensions, g0, weights)
    }

    /// Builds g0 from raw observations by applying one rule per dimension.
    ///
    /// `cutoffs` is an "Indicator"/"Cutoff" table and is aligned by name the
    /// same way the weights are.
    pub fn from_raw<S: AsRef<str>, T: AsRef<str>>(
        dimensions: Vec<String>,
        rows: &[Vec<RawValue>],
        cutoffs: &[(T, IndicatorRule)],
        weights: &[(S, f64)],
    ) -> Result<Self> {
        let rules = align_by_name(&dimensions, cutoffs, "cutoff")?;
        Self::from_raw_with(dimensions, rows, &rules, weights)
    }

    /// Like [`DeprivationMatrix::from_raw`], with caller-supplied rules already
    /// in column order.
    pub fn from_raw_with<R: DeprivationRule, S: AsRef<str>>(
        dimensions: Vec<String>,
        rows: &[Vec<RawValue>],
        rules: &[R],
        weights: &[(S, f64)],
    ) -> Result<Self> {
        let m = dimensions.len();
        if rules.len() != m {
            return Err(AfError::ShapeMismatch(format!(
                "{} rules given for {} dimensions.",
                rules.len(),
                m
            )));
        }

        let mut bits = Vec::with_capacity(rows.len() * m);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != m {
                return Err(AfError::ShapeMismatch(format!(
                    "Person {} has {} entries, expected {}.",
                    i,
                    row.len(),
                    m
                )));
            }
            for (j, (value, rule)) in row.iter().zip(rules).enumerate() {
                let deprived = rule.is_deprived(value).map_err(|e| {
                    AfError::InvalidValue(format!("person {}, '{}': {}", i, dimensions[j], e))
                })?;
                bits.push(if deprived { 1.0 } else { 0.0 });
            }
        }

        let g0 = Matrix::from_shape_vec((rows.len(), m), bits)?;
        Self::new(dimensions, g0, weights)
    }

    /// Returns a copy whose weights are rescaled to sum to 1.
    pub fn normalized(&self) -> Self {
        let total = self.total_weight();
        DeprivationMatrix {
            dimensions: self.dimensions.clone(),
            g0: self.g0.clone(),
            weights: self.weights.mapv(|w| w / total),
        }
    }

    /// N
    pub fn n_persons(&self) -> usize {
        self.g0.nrows()
    }

    /// M
    pub fn n_dimensions(&self) -> usize {
        self.g0.ncols()
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// g0(i, j). Panics if out of bounds, like ndarray indexing.
    pub fn g0(&self, person: usize, dimension: usize) -> f64 {
        self.g0[[person, dimension]]
    }

    /// w(j), in column order.
    pub fn weight(&self, dimension: usize) -> f64 {
        self.weights[dimension]
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.g0.view()
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Σw, the largest score any person can reach.
    pub fn total_weight(&self) -> f64 {
        crate::utils::sequential_sum(self.weights.view())
    }

    /// Column index of a named dimension.
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == name)
    }
}

/// Reorders a name-keyed table into column order.
///
/// Both sides must name the same set of dimensions, each exactly once.
fn align_by_name<'a, K: AsRef<str>, V>(
    dimensions: &[String],
    table: &'a [(K, V)],
    what: &str,
) -> Result<Vec<&'a V>> {
    let mut column_of: HashMap<&str, usize> = HashMap::with_capacity(dimensions.len());
    for (j, name) in dimensions.iter().enumerate() {
        if column_of.insert(name.as_str(), j).is_some() {
            return Err(AfError::ShapeMismatch(format!(
                "Dimension '{}' appears more than once in the matrix.",
                name
            )));
        }
    }

    if table.len() != dimensions.len() {
        return Err(AfError::ShapeMismatch(format!(
            "The {} table has {} entries, but the matrix has {} dimensions.",
            what,
            table.len(),
            dimensions.len()
        )));
    }

    let mut aligned: Vec<Option<&V>> = vec![None; dimensions.len()];
    for (name, value) in table {
        let name = name.as_ref();
        let j = *column_of.get(name).ok_or_else(|| {
            AfError::ShapeMismatch(format!(
                "The {} table names '{}', which is not a matrix dimension.",
                what, name
            ))
        })?;
        if aligned[j].replace(value).is_some() {
            return Err(AfError::ShapeMismatch(format!(
                "The {} table lists '{}' more than once.",
                what, name
            )));
        }
    }

    // Equal lengths and no duplicates means every slot is filled.
    Ok(aligned.into_iter().flatten().collect())
}

fn validate_weights(dimensions: &[String], weights: ArrayView1<f64>) -> Result<()> {
    for (name, &w) in dimensions.iter().zip(weights.iter()) {
        if !w.is_finite() || w < 0.0 {
            return Err(AfError::InvalidValue(format!(
                "Weight of '{}' must be a non-negative finite number, got {}.",
                name, w
            )));
        }
    }
    if weights.iter().all(|&w| w == 0.0) {
        return Err(AfError::InvalidValue(
            "At least one weight must be nonzero.".to_string(),
        ));
    }
    Ok(())
}

fn validate_cells(dimensions: &[String], g0: ArrayView2<f64>) -> Result<()> {
    for ((i, j), &cell) in g0.indexed_iter() {
        if cell != 0.0 && cell != 1.0 {
            return Err(AfError::InvalidValue(format!(
                "Cell (person {}, '{}') must be 0 or 1, got {}.",
                i, dimensions[j], cell
            )));
        }
    }
    Ok(())
}
