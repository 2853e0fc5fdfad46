use thiserror::Error;

/// Out-of-order gesture calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("rotation continued without a matching begin")]
    NotRotating,
    #[error("pan continued without a matching begin")]
    NotPanning,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings '{name}'")]
    Load {
        name: &'static str,
        #[source]
        source: confy::ConfyError,
    },
    #[error("failed to store settings '{name}'")]
    Store {
        name: &'static str,
        #[source]
        source: confy::ConfyError,
    },
}
