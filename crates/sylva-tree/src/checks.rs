//! Input validation shared by the builder and the learners.

use crate::error::TreeError;
use crate::matrix::F64Matrix;

/// Check that observations, targets, indices and weights describe one consistent dataset.
pub(crate) fn validate_training(
    observations: &F64Matrix,
    targets: &[f64],
    indices: &[usize],
    weights: &[f64],
) -> Result<(), TreeError> {
    let rows = observations.rows();
    if rows == 0 {
        return Err(TreeError::EmptyDataset);
    }
    if observations.cols() == 0 {
        return Err(TreeError::ZeroFeatures);
    }
    if targets.len() != rows {
        return Err(TreeError::TargetCountMismatch {
            expected: rows,
            got: targets.len(),
        });
    }
    if !weights.is_empty() && weights.len() != rows {
        return Err(TreeError::WeightCountMismatch {
            expected: rows,
            got: weights.len(),
        });
    }
    if indices.is_empty() {
        return Err(TreeError::EmptyIndices);
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= rows) {
        return Err(TreeError::IndexOutOfRange { index, rows });
    }
    for (row, values) in observations.iter_rows().enumerate() {
        if let Some(feature) = values.iter().position(|v| !v.is_finite()) {
            return Err(TreeError::NonFiniteValue { row, feature });
        }
    }
    if let Some(row) = targets.iter().position(|t| !t.is_finite()) {
        return Err(TreeError::NonFiniteTarget { row });
    }
    if let Some((row, &weight)) = weights
        .iter()
        .enumerate()
        .find(|&(_, w)| !w.is_finite() || *w < 0.0)
    {
        return Err(TreeError::InvalidWeight { row, weight });
    }
    Ok(())
}

/// Check that every class label is a whole number.
pub(crate) fn validate_class_labels(targets: &[f64]) -> Result<(), TreeError> {
    match targets.iter().position(|t| t.fract() != 0.0) {
        Some(row) => Err(TreeError::NonIntegralClassLabel {
            row,
            target: targets[row],
        }),
        None => Ok(()),
    }
}

/// Distinct values in order of first appearance.
pub(crate) fn distinct_targets(targets: &[f64]) -> Vec<f64> {
    let mut seen = std::collections::HashSet::new();
    targets
        .iter()
        .copied()
        .filter(|t| seen.insert((t + 0.0).to_bits()))
        .collect()
}
