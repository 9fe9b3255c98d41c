//! Discord client errors

use roster_core::DomainError;

/// Errors returned by the Discord REST client
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    /// Missing token, application id, or a zero id argument
    #[error("Discord client configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied value that cannot be sent to Discord
    #[error("Invalid Discord request: {0}")]
    InvalidArgument(String),

    /// Reading from Discord returned a non-success status
    #[error("Failed to fetch member: {status} {body}")]
    Fetch { status: u16, body: String },

    /// Writing to Discord returned a non-success status
    #[error("Failed to update Discord: {status} {body}")]
    Update { status: u16, body: String },

    /// The request never produced a response (connect error, timeout)
    #[error("Discord transport error: {0}")]
    Transport(String),

    /// A success response whose body could not be decoded
    #[error("Discord response decode error: {0}")]
    InvalidResponse(String),
}

impl From<DiscordError> for DomainError {
    fn from(err: DiscordError) -> Self {
        match err {
            DiscordError::Configuration(msg) => DomainError::PlatformConfiguration(msg),
            DiscordError::InvalidArgument(msg) => DomainError::ValidationError(msg),
            DiscordError::Fetch { status, body } => DomainError::PlatformFetch { status, body },
            DiscordError::Update { status, body } => DomainError::PlatformUpdate { status, body },
            DiscordError::Transport(msg) => DomainError::PlatformTransport(msg),
            DiscordError::InvalidResponse(msg) => {
                DomainError::PlatformTransport(format!("invalid response: {msg}"))
            }
        }
    }
}
