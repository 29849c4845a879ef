// src/core/errors.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AfError {
    /// Dimension names or counts disagree between the matrix and the weight table.
    #[error("Shape Mismatch: {0}")]
    ShapeMismatch(String),

    /// A cell, weight or cutoff lies outside its domain.
    #[error("Invalid Value: {0}")]
    InvalidValue(String),

    /// Raised only under `DegeneratePolicy::Error` when there are no persons.
    #[error("Empty Population: {0}")]
    EmptyPopulation(String),

    #[error("Invalid Configuration: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML Parse Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Ndarray Error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, AfError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn shape_error_converts_with_question_mark() {
        fn build() -> Result<Array2<f64>> {
            Ok(Array2::from_shape_vec((2, 2), vec![1.0, 0.0, 1.0])?)
        }
        assert!(matches!(build(), Err(AfError::Ndarray(_))));
    }

    #[test]
    fn display_names_the_category() {
        let err = AfError::ShapeMismatch("weights lack 'water'".to_string());
        assert_eq!(err.to_string(), "Shape Mismatch: weights lack 'water'");
    }
}
