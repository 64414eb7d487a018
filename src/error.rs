use thiserror::Error;

/// Errors surfaced by the crate's fallible edges.
///
/// The per-frame paths never return these: out-of-range options are clamped,
/// missing collaborators are logged and skipped, and redundant teardown is a
/// no-op. What remains fallible is loading configuration.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
