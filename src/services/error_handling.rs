use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, MindFlowError>;

/// Failures surfaced to whoever initiated a mutation or load.
///
/// Rendering never produces one of these; bad records are filtered out of
/// the view instead.
#[derive(Error, Debug)]
pub enum MindFlowError {
    #[error("Task not found: {id}")]
    TaskNotFound { id: Uuid },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: Uuid },

    #[error("A category named '{name}' already exists")]
    DuplicateCategory { name: String },

    #[error("Validation failed for {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Database operation failed: {operation}")]
    DatabaseError {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

impl MindFlowError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let (field, reason) = (field.into(), reason.into());
        LogHelper::log_validation_failure(&field, &reason);
        Self::ValidationError { field, reason }
    }

    pub fn database(operation: impl Into<String>, source: anyhow::Error) -> Self {
        let operation = operation.into();
        LogHelper::log_error_with_context(&operation, &source);
        Self::DatabaseError { operation, source }
    }
}

/// Wraps a data-layer result with the operation name and a few details.
pub struct ErrorContext {
    operation: String,
    details: Vec<(String, String)>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.details.push((key.into(), value.to_string()));
        self
    }

    pub fn wrap<T>(self, result: anyhow::Result<T>) -> Result<T> {
        result.map_err(|source| {
            let mut operation = self.operation;
            for (key, value) in self.details {
                operation.push_str(&format!(" [{}={}]", key, value));
            }
            MindFlowError::database(operation, source)
        })
    }
}

/// Structured logging helpers
pub struct LogHelper;

impl LogHelper {
    pub fn log_task_operation(operation: &str, task_id: Uuid, success: bool) {
        if success {
            info!(task_id = %task_id, operation = %operation, "Task operation completed");
        } else {
            error!(task_id = %task_id, operation = %operation, "Task operation failed");
        }
    }

    pub fn log_error_with_context(context: &str, error: &anyhow::Error) {
        error!(
            context = %context,
            error = %error,
            error_chain = ?error.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
            "Error occurred"
        );
    }

    pub fn log_validation_failure(field: &str, reason: &str) {
        warn!(field = %field, reason = %reason, "Validation failed");
    }
}

/// User-facing error messages
pub struct UserErrorFormatter;

impl UserErrorFormatter {
    pub fn format_for_ui(error: &MindFlowError) -> String {
        match error {
            MindFlowError::TaskNotFound { .. } => "The requested task could not be found.".to_string(),
            MindFlowError::CategoryNotFound { .. } => {
                "The requested category could not be found.".to_string()
            }
            MindFlowError::DuplicateCategory { name } => {
                format!("You already have a category called \"{}\".", name)
            }
            MindFlowError::ValidationError { field, reason } => format!("Invalid {}: {}", field, reason),
            MindFlowError::DatabaseError { .. } => {
                "Your tasks could not be saved or loaded. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting() {
        let error = MindFlowError::TaskNotFound { id: Uuid::new_v4() };
        assert!(UserErrorFormatter::format_for_ui(&error).contains("could not be found"));

        let error = MindFlowError::DuplicateCategory {
            name: "Work".to_string(),
        };
        assert!(UserErrorFormatter::format_for_ui(&error).contains("Work"));
    }

    #[test]
    fn test_error_context() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("disk I/O error"));
        let task_id = Uuid::new_v4();

        let wrapped = ErrorContext::new("update_task")
            .with_detail("task_id", task_id)
            .wrap(result);

        match wrapped {
            Err(MindFlowError::DatabaseError { operation, source }) => {
                assert!(operation.contains("update_task"));
                assert!(operation.contains(&task_id.to_string()));
                assert_eq!(source.to_string(), "disk I/O error");
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_constructor() {
        let error = MindFlowError::validation("title", "must not be empty");
        assert_eq!(error.to_string(), "Validation failed for title: must not be empty");
    }
}
