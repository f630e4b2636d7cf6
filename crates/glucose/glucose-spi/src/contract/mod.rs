//! Contract module containing trait definitions for the learned-model path
//!
//! Both traits are implemented outside this workspace by whatever trained
//! the model; the core only ever calls them through a `ModelHandle`.

mod feature_scaler;
mod scorer;

pub use feature_scaler::FeatureScaler;
pub use scorer::Scorer;
