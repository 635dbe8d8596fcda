use derive_more::{Display, Error};

/// Failures reported by run-length encoded collections.
///
/// All of them are detected before any mutation happens, a failed call never leaves a
/// collection in a partially edited state. Public operations wrap these errors in
/// `eyre::Report`; use `Report::downcast_ref::<RleError>()` to inspect the category.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RleError {
    #[display("Index {index} is out of range for a vector of dimension {dim}")]
    OutOfRange { index: usize, dim: usize },

    #[display("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[display("Operation '{operation}' is not supported by run-length encoded vectors")]
    Unsupported { operation: &'static str },

    #[display("Invalid run list: values and lengths differ in size ({values} != {lengths})")]
    InvalidRun { values: usize, lengths: usize },

    #[display("Run starting at {start} has zero length")]
    EmptyRun { start: usize },
}

impl RleError {
    /// Ensure that `index` falls inside `[0, dim)`.
    #[inline]
    pub fn check_index(index: usize, dim: usize) -> Result<(), Self> {
        if index < dim {
            Ok(())
        } else {
            Err(RleError::OutOfRange { index, dim })
        }
    }

    /// Ensure that two dimensions are equal.
    #[inline]
    pub fn check_dim(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(RleError::DimensionMismatch { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert!(RleError::check_index(0, 1).is_ok());
        assert_eq!(
            RleError::check_index(3, 3),
            Err(RleError::OutOfRange { index: 3, dim: 3 })
        );
        assert!(RleError::check_dim(5, 5).is_ok());
        assert_eq!(
            RleError::check_dim(5, 4),
            Err(RleError::DimensionMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_report_downcast() {
        let report: eyre::Report = RleError::Unsupported { operation: "sort" }.into();
        assert_eq!(
            report.downcast_ref::<RleError>(),
            Some(&RleError::Unsupported { operation: "sort" })
        );
        assert_eq!(
            report.to_string(),
            "Operation 'sort' is not supported by run-length encoded vectors"
        );
    }
}
