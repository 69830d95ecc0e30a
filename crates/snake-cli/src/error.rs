use std::path::PathBuf;

use snake_saga::SagaError;
use thiserror::Error;

use crate::actions::DemoError;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to read plan '{path}'")]
    ReadPlan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan '{path}'")]
    ParsePlan {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("saga did not commit")]
    Saga(#[from] SagaError<DemoError>),
}

pub(crate) type Result<T> = std::result::Result<T, CliError>;
