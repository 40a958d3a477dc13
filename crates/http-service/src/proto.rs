use bytes::Bytes;
use reqwest::Url;
use serde::Deserialize;
use symptom_chat_service::{Condition, ErrorKind, QueryReply};

use crate::Error;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct QueryPayload {
    /// The server echoes the symptoms back; only used for logging.
    pub symptoms: Option<String>,
    pub response: String,
    pub conditions: Option<Vec<ConditionPayload>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConditionPayload {
    pub condition: String,
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HealthPayload {
    pub status: String,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn query_url(base_url: &str, symptoms: &str) -> Result<Url, Error> {
    Url::parse_with_params(
        &format!("{base_url}/query"),
        &[("symptoms", symptoms)],
    )
    .map_err(|err| Error::new(format!("invalid url: {err}"), ErrorKind::Other))
}

#[inline]
pub fn health_url(base_url: &str) -> Result<Url, Error> {
    Url::parse(&format!("{base_url}/health"))
        .map_err(|err| Error::new(format!("invalid url: {err}"), ErrorKind::Other))
}

pub fn decode_reply(body: &Bytes) -> Result<QueryReply, Error> {
    let payload: QueryPayload = serde_json::from_slice(body).map_err(|err| {
        Error::new(format!("bad query payload: {err}"), ErrorKind::Malformed)
    })?;
    trace!("decoded reply for {:?}", payload.symptoms);

    let mut conditions = vec![];
    for item in payload.conditions.unwrap_or_default() {
        if item.condition.trim().is_empty() {
            return Err(Error::new(
                "condition without a name",
                ErrorKind::Malformed,
            ));
        }
        conditions.push(Condition {
            condition: item.condition,
            text: item.text.unwrap_or_default(),
        });
    }

    Ok(QueryReply {
        response: payload.response,
        conditions,
    })
}

/// Extracts the `error` field the server puts in non-successful bodies.
#[inline]
pub fn decode_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.error)
}

#[inline]
pub fn decode_health(body: &Bytes) -> Result<bool, Error> {
    let payload: HealthPayload = serde_json::from_slice(body).map_err(|err| {
        Error::new(format!("bad health payload: {err}"), ErrorKind::Malformed)
    })?;
    Ok(payload.status == "healthy")
}
