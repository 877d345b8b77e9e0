//! Parallel forest training: bootstrap draws and per-tree seeding.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sylva_tree::{DecisionTreeConfig, F64Matrix, TreeError};
use tracing::{debug, info, instrument};

use crate::config::{ForestConfig, MaxFeatures};
use crate::error::ForestError;

/// Draw `draw_count` entries of `indices` uniformly with replacement.
fn bootstrap_sample(indices: &[usize], draw_count: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..draw_count)
        .map(|_| indices[rng.gen_range(0..indices.len())])
        .collect()
}

/// Number of rows drawn for each tree.
pub(crate) fn draw_count(ratio: f64, n_indices: usize) -> Result<usize, ForestError> {
    let count = (ratio * n_indices as f64).round() as usize;
    if count == 0 {
        return Err(ForestError::EmptyBootstrap { ratio, n_indices });
    }
    Ok(count)
}

fn check_indices(observations: &F64Matrix, indices: &[usize]) -> Result<(), TreeError> {
    if observations.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    if observations.cols() == 0 {
        return Err(TreeError::ZeroFeatures);
    }
    if indices.is_empty() {
        return Err(TreeError::EmptyIndices);
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= observations.rows()) {
        return Err(TreeError::IndexOutOfRange {
            index,
            rows: observations.rows(),
        });
    }
    Ok(())
}

/// Grow `config.n_trees` trees in parallel, each on its own bootstrap sample.
///
/// Per-tree seeds are drawn from the master generator before fanning out, so
/// the ensemble does not depend on thread scheduling. `grow` receives the
/// tree configuration and the bootstrap indices. Trees keep their seed order.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_indices = indices.len()))]
pub(crate) fn grow_forest<M, F>(
    config: &ForestConfig,
    fallback: MaxFeatures,
    observations: &F64Matrix,
    indices: &[usize],
    grow: F,
) -> Result<Vec<M>, ForestError>
where
    M: Send,
    F: Fn(&DecisionTreeConfig, &[usize]) -> Result<M, TreeError> + Sync,
{
    check_indices(observations, indices)?;
    let n_features = observations.cols();
    let features_per_split = config.max_features.resolve(n_features, fallback)?;
    let draw_count = draw_count(config.sub_sample_ratio, indices.len())?;

    info!(
        n_trees = config.n_trees,
        n_features,
        features_per_split,
        draw_count,
        split_method = ?config.split_method,
        "training forest"
    );

    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let trees = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sample = bootstrap_sample(indices, draw_count, &mut rng);
            let tree_config = config.tree_config(features_per_split, rng.r#gen());
            grow(&tree_config, &sample)
        })
        .collect::<Result<Vec<M>, TreeError>>()?;

    debug!(n_trees_trained = trees.len(), "tree training complete");
    Ok(trees)
}

/// Sum per-tree importances column by column.
pub(crate) fn sum_importance<'a>(n_features: usize, per_tree: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
    let mut total = vec![0.0; n_features];
    for importance in per_tree {
        for (sum, value) in total.iter_mut().zip(importance) {
            *sum += value;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize) -> F64Matrix {
        F64Matrix::new(rows, cols, (0..rows * cols).map(|v| v as f64).collect()).unwrap()
    }

    #[test]
    fn bootstrap_draws_from_given_indices() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let indices = [3, 5, 7];
        let sample = bootstrap_sample(&indices, 50, &mut rng);
        assert_eq!(sample.len(), 50);
        assert!(sample.iter().all(|i| indices.contains(i)));
        // with replacement
        assert!(indices.iter().all(|i| sample.contains(i)));
    }

    #[test]
    fn draw_count_rounds() {
        assert_eq!(draw_count(1.0, 26).unwrap(), 26);
        assert_eq!(draw_count(0.5, 25).unwrap(), 13);
        assert_eq!(draw_count(2.0, 3).unwrap(), 6);
        assert_eq!(
            draw_count(0.1, 4).unwrap_err(),
            ForestError::EmptyBootstrap { ratio: 0.1, n_indices: 4 }
        );
    }

    #[test]
    fn index_checks() {
        let observations = matrix(4, 2);
        assert_eq!(check_indices(&observations, &[]).unwrap_err(), TreeError::EmptyIndices);
        assert_eq!(
            check_indices(&observations, &[0, 4]).unwrap_err(),
            TreeError::IndexOutOfRange { index: 4, rows: 4 }
        );
        assert!(check_indices(&observations, &[0, 3, 3]).is_ok());
    }

    #[test]
    fn trees_receive_distinct_seeds_in_order() {
        let observations = matrix(10, 4);
        let indices: Vec<usize> = (0..10).collect();
        let config = ForestConfig::new(8).unwrap().with_seed(7);
        let grown = |c: &DecisionTreeConfig, s: &[usize]| Ok::<_, TreeError>((c.seed(), c.features_per_split(), s.to_vec()));

        let first = grow_forest(&config, MaxFeatures::Sqrt, &observations, &indices, grown).unwrap();
        let second = grow_forest(&config, MaxFeatures::Sqrt, &observations, &indices, grown).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
        assert!(first.iter().all(|(_, features, sample)| *features == 2 && sample.len() == 10));
        let mut seeds: Vec<u64> = first.iter().map(|(seed, _, _)| *seed).collect();
        seeds.dedup();
        assert_eq!(seeds.len(), 8);
    }

    #[test]
    fn tree_errors_propagate() {
        let observations = matrix(4, 1);
        let config = ForestConfig::new(3).unwrap();
        let err = grow_forest(&config, MaxFeatures::All, &observations, &[0, 1], |_, _| {
            Err::<(), _>(TreeError::EmptyDataset)
        })
        .unwrap_err();
        assert_eq!(err, ForestError::Tree(TreeError::EmptyDataset));
    }

    #[test]
    fn importance_sums_columns() {
        let a = [1.0, 0.0, 2.0];
        let b = [0.5, 0.5, 0.0];
        let total = sum_importance(3, [&a[..], &b[..]].into_iter());
        assert_eq!(total, vec![1.5, 0.5, 2.0]);
    }
}
