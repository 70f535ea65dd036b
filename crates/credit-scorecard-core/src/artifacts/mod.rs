pub mod bundle;
pub mod feature_spec;
pub mod model;
pub mod score_config;

pub use bundle::{ArtifactBundle, BUILTIN_BUNDLE_JSON};
pub use feature_spec::{
    normalize_category, AuxiliaryInput, CategoricalBinning, Clamp, DerivedRatio, FeatureEncoding,
    FeatureKind, FeatureSpec, NumericBinning,
};
pub use model::{ModelMetadata, ModelParameters};
pub use score_config::{RatingBand, RatingTable, ScoreConfig};
