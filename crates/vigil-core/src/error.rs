use thiserror::Error;

/// Errors raised by Vigil itself.
///
/// Callback failures are not wrapped here; they travel as `anyhow::Error`
/// straight back to whoever triggered the action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A consumer looked up its coordinator outside of the provider that
    /// publishes it.
    #[error("{consumer} must be used within <{provider}>")]
    MissingProvider {
        consumer: &'static str,
        provider: &'static str,
    },

    /// A coordinator was asked to do work after it was unmounted.
    #[error("{coordinator} used after unmount")]
    Unmounted { coordinator: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
