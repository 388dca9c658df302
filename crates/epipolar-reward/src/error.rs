use epipolar_reward_core::CorrespondenceError;
use thiserror::Error;

/// Errors raised while grading a batch of matches.
///
/// Every variant is a structural problem with the input; numeric trouble
/// inside the geometry oracle never surfaces here.
#[derive(Debug, Error)]
pub enum RewardError {
    /// Image and match batches disagree on the number of scenes.
    #[error("batch has {images} image scenes but {matches} match scenes")]
    SceneCountMismatch { images: usize, matches: usize },
    /// A scene has a different image count than the first scene.
    #[error("scene {scene} has {got} images, expected {expected}")]
    RaggedImages {
        scene: usize,
        expected: usize,
        got: usize,
    },
    /// Scenes need at least two images to form a pair.
    #[error("scenes need at least 2 images, got {0}")]
    TooFewImages(usize),
    /// A scene does not carry one correspondence set per image pair.
    #[error("scene {scene} has {got} correspondence sets, expected {expected} for {images} images")]
    PairCountMismatch {
        scene: usize,
        images: usize,
        expected: usize,
        got: usize,
    },
    /// A correspondence set failed validation.
    #[error("scene {scene}, pair ({i}, {j}): {source}")]
    InvalidMatches {
        scene: usize,
        i: usize,
        j: usize,
        #[source]
        source: CorrespondenceError,
    },
    /// A standalone correspondence set failed validation.
    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),
    /// The classifier received point sequences of different lengths.
    #[error("point sequences differ in length: {a} vs {b}")]
    PointCountMismatch { a: usize, b: usize },
    /// The oracle returned a distance vector not aligned with its input.
    #[error("oracle returned {got} distances for {expected} correspondences")]
    OracleLengthMismatch { expected: usize, got: usize },
    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
