use async_openai::error::OpenAIError;
use thiserror::Error;

/// Errors raised at the model boundary. Always fatal to the current
/// execution loop; never retried automatically.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The underlying API call failed (transport, auth, rate limit, ...).
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// The model produced neither text nor tool calls.
    #[error("Model reply carried no usable content")]
    EmptyReply,

    /// A request or reply payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A catch-all variant for gateway implementations outside this crate.
    #[error("{0}")]
    Other(String),
}
