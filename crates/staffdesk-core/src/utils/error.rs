use staffdesk_store::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

/// Failures surfaced by the service layer.
///
/// Reads degrade to an empty or zero view state; writes and validation are
/// shown to the user as a blocking message. Nothing finer-grained (not found,
/// conflict, server error) is distinguished.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Load failed: {0}")]
    ReadFailed(#[source] StoreError),

    #[error("Write failed: {0}")]
    WriteFailed(#[source] StoreError),

    #[error("Write failed: {0}")]
    WriteRejected(String),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_read(&self) -> bool {
        matches!(self, AppError::ReadFailed(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        AppError::Validation(messages.join(" "))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
