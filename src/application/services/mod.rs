//! Application services - use case implementations over the repositories

mod generator_service;
mod template_service;

pub use generator_service::{
    GenerateOptions, GeneratorService, GeneratorServiceImpl,
};
pub use template_service::{
    CreateTemplateRequest, TemplateItem, TemplateService, TemplateServiceImpl, TemplateSkill,
};

/// Error taxonomy shared by the services.
///
/// `Validation` means the caller's input is semantically invalid and the
/// call is recoverable by correcting it; `Persistence` means the store
/// rejected or failed an operation. Either way the in-progress aggregate
/// operation is rolled back whole - no partial aggregate is ever visible.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
