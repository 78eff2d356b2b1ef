use thiserror::Error;

use crate::model::Dataset;

/// Why a dataset could not be loaded. Either kind aborts that dataset only.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{dataset}: source unavailable ({source_name}): {reason}")]
    SourceUnavailable {
        dataset: Dataset,
        source_name: String,
        reason: String,
    },

    #[error("{dataset}: invalid JSON on line {line}: {source}")]
    Parse {
        dataset: Dataset,
        line: usize, // 0-based physical line
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn unavailable(dataset: Dataset, source_name: &str, reason: impl ToString) -> Self {
        LoadError::SourceUnavailable {
            dataset,
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            LoadError::SourceUnavailable { dataset, .. } | LoadError::Parse { dataset, .. } => {
                *dataset
            }
        }
    }

    /// Failing line for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Parse { line, .. } => Some(*line),
            LoadError::SourceUnavailable { .. } => None,
        }
    }
}
