pub mod offers;

use thiserror::Error;

use crate::render::InitError;

/// Errors surfaced by the service layer to the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The offer lookup feature is unavailable on this site.
    #[error("offer lookup unavailable: {0}")]
    Init(#[from] InitError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
