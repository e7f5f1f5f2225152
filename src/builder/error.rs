//! Build errors for machine definition builders.

use thiserror::Error;

/// Errors that can occur when assembling a machine definition.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,
}
