//! Forest ensembles built on sylva-tree: train, vote, average.
//!
//! Random forests (exhaustive split search on bootstrap samples) and
//! extremely randomized trees (one random threshold per feature) for
//! classification and regression. Trees are grown in parallel via rayon
//! with per-tree seeds drawn from a master generator.

mod config;
mod error;
mod forest;
mod learner;
mod model;

pub use config::{ForestConfig, MaxFeatures};
pub use error::ForestError;
pub use learner::{ClassificationForestLearner, RegressionForestLearner};
pub use model::{ClassificationForestModel, RegressionForestModel};
