//! Name-keyed variable importance reporting.

use crate::error::TreeError;

/// A feature with its scaled importance and rank.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Importance scaled so the most important feature scores 100.
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Scale raw importances to 0-100 by their maximum and rank them.
///
/// Features are sorted descending by importance. Ties keep column order.
/// When every raw importance is zero, every scaled value is zero.
///
/// # Errors
///
/// Returns [`TreeError::FeatureNameCountMismatch`] if `names` and `raw`
/// differ in length.
pub fn rank_features(raw: &[f64], names: &[String]) -> Result<Vec<RankedFeature>, TreeError> {
    if raw.len() != names.len() {
        return Err(TreeError::FeatureNameCountMismatch {
            expected: raw.len(),
            got: names.len(),
        });
    }
    let max = raw.iter().copied().fold(0.0f64, f64::max);
    let scale = if max > 0.0 { 100.0 / max } else { 0.0 };

    let mut features: Vec<RankedFeature> = names
        .iter()
        .zip(raw)
        .map(|(name, &value)| RankedFeature {
            name: name.clone(),
            importance: value * scale,
            rank: 0,
        })
        .collect();

    features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feature) in features.iter_mut().enumerate() {
        feature.rank = i + 1;
    }
    Ok(features)
}
