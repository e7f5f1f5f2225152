//! Construction errors for the synchronizer.

use crate::core::{DefinitionError, RouteError};
use crate::machine::MachineError;
use thiserror::Error;

/// Errors that can occur while wiring a router together. All of them are
/// construction-time: once attached, the synchronizer itself does not
/// fail.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Machine(#[from] MachineError),
}
