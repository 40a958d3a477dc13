use serde::{Deserialize, Serialize};
use symptom_chat_service::QueryReply;

/// How the service should answer one query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Answer successfully with the reply.
    #[serde(rename = "reply")]
    Reply(QueryReply),
    /// Fail as if the connection broke, with a diagnostic message.
    #[serde(rename = "transport_failure")]
    TransportFailure(String),
    /// Fail as if the payload could not be decoded.
    #[serde(rename = "malformed")]
    Malformed,
}

impl PresetReply {
    /// Creates a successful preset.
    #[inline]
    pub fn reply(reply: QueryReply) -> Self {
        Self::Reply(reply)
    }

    /// Creates a transport failure preset.
    #[inline]
    pub fn transport_failure<S: Into<String>>(message: S) -> Self {
        Self::TransportFailure(message.into())
    }
}
