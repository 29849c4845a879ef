// src/lib.rs

//! `af_rs` is a Rust crate for computing the Alkire-Foster multidimensional
//! poverty index: deprivation scores, the censored deprivation matrix, and the
//! headcount ratio (H), intensity (A) and adjusted headcount ratio (Mo).
//!
//! ```
//! use af_rs::{AlkireFoster, DeprivationMatrix};
//! use ndarray::array;
//!
//! let matrix = DeprivationMatrix::new(
//!     vec!["water".into(), "electricity".into(), "schooling".into()],
//!     array![[1.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
//!     &[("water", 1.0), ("electricity", 1.0), ("schooling", 1.0)],
//! )?;
//!
//! // Scores are computed once; each cutoff only re-censors.
//! let engine = AlkireFoster::new(matrix, None)?;
//! let profile = engine.evaluate(1.0)?;
//!
//! assert_eq!(profile.aggregates.headcount_ratio, 50.0);
//! assert!((profile.aggregates.adjusted_headcount_ratio - 1.0 / 3.0).abs() < 1e-12);
//! # Ok::<(), af_rs::AfError>(())
//! ```

// Declare the main modules of the crate
pub mod algorithms;
pub mod core;
pub mod traits;
pub mod utils;

// Re-export key components for easier use by library consumers
pub use crate::algorithms::{
    aggregate, pairwise_products, subgroup_shares, Aggregates, AlkireFoster, CensoredDeprivation,
    CrossProducts, Demographic, PovertyProfile, PovertyStatus, SubgroupShares, WeightedDeprivation,
};
pub use crate::core::{
    AfError, DegeneratePolicy, DeprivationMatrix, EngineConfig, IndicatorRule, Matrix, RawValue,
    Result, Scores,
};
pub use crate::traits::DeprivationRule;
