use thiserror::Error;

/// Errors raised while loading a dataset. All of them are caller errors:
/// the bundled dataset never produces one.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate category id \"{id}\" (phases {first_phase} and {second_phase})")]
    DuplicateCategory {
        id: String,
        first_phase: String,
        second_phase: String,
    },

    #[error("duplicate phase id \"{id}\"")]
    DuplicatePhase { id: String },
}

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
