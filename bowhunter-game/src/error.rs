use thiserror::Error;

/// Rejections raised by progression operations. None of them leave state
/// partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown animal `{0}`")]
    UnknownAnimal(String),
    #[error("unknown recipe `{0}`")]
    UnknownRecipe(String),
    #[error("unknown area `{0}`")]
    UnknownArea(String),
    #[error("area `{0}` is still locked")]
    AreaLocked(String),
    #[error("not enough materials to craft `{recipe}`")]
    InsufficientMaterials { recipe: String },
    #[error("unrecognized hunt outcome `{0}`")]
    InvalidOutcome(String),
    #[error("unrecognized math topic `{0}`")]
    InvalidTopic(String),
    #[error("unrecognized difficulty `{0}`")]
    InvalidDifficulty(String),
}
