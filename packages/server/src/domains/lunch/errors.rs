use thiserror::Error;

/// Failures of a lunch operation.
///
/// Acting after the cutoff and publishing twice are not errors; they are
/// ordinary outcomes of the operations.
#[derive(Error, Debug)]
pub enum LunchError {
    #[error("roster store unavailable during {operation}: {source}")]
    StoreUnavailable {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl LunchError {
    pub fn operation(&self) -> &'static str {
        match self {
            LunchError::StoreUnavailable { operation, .. } => operation,
        }
    }
}

/// Tag a store failure with the operation it interrupted.
pub(crate) fn store_unavailable(operation: &'static str) -> impl FnOnce(anyhow::Error) -> LunchError {
    move |source| LunchError::StoreUnavailable { operation, source }
}
