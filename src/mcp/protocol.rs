//! JSON-RPC 2.0 framing for the cut-list MCP server.
//!
//! A line from the client is either a [`Request`] (has an `id`, always gets
//! exactly one [`Response`] or [`RpcError`] back) or a [`Notification`]
//! (no `id`, never answered). Cabinet layouts travel inside the
//! `params.arguments` of `tools/call` requests and are parsed by the server,
//! not here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision the server speaks.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "cabinet-cutlist-mcp";

const JSONRPC_VERSION: &str = "2.0";

/// Request identifier: an integer or a string, never `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer id.
    Number(i64),
    /// String id.
    String(String),
}

/// A call that expects an answer.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Caller-chosen id echoed in the answer.
    pub id: RequestId,
    /// Method name, e.g. `tools/call`.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Deserialises `params` into `T`, answering `invalid_params` when they
    /// are missing or malformed.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_params` error naming `what`.
    pub fn params_as<T: serde::de::DeserializeOwned>(&self, what: &str) -> Result<T, RpcError> {
        let Some(params) = self.params.as_ref() else {
            return Err(RpcError::invalid_params(
                self.id.clone(),
                format!("Missing {what} params"),
            ));
        };
        T::deserialize(params).map_err(|e| {
            RpcError::invalid_params(self.id.clone(), format!("Invalid {what} params: {e}"))
        })
    }
}

/// A one-way message from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Notification name, e.g. `notifications/initialized`.
    pub method: String,
}

/// Anything the client may send.
#[derive(Debug, Clone)]
pub enum Incoming {
    /// Needs an answer.
    Request(Request),
    /// Must not be answered.
    Notification(Notification),
}

impl Incoming {
    /// Method name of the message.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(req) => &req.method,
            Self::Notification(note) => &note.method,
        }
    }

    /// Parses one line of input.
    ///
    /// # Errors
    ///
    /// Returns `parse_error` for anything that is not a JSON object and
    /// `invalid_request` for objects that are not JSON-RPC 2.0 messages.
    pub fn parse(line: &str) -> Result<Self, RpcError> {
        let value: Value = serde_json::from_str(line).map_err(|_| RpcError::parse_error())?;
        let Some(object) = value.as_object() else {
            return Err(RpcError::parse_error());
        };

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(RpcError::invalid_request(None, "jsonrpc must be \"2.0\""));
        }

        if !object.contains_key("id") {
            return serde_json::from_value(value)
                .map(Self::Notification)
                .map_err(|_| RpcError::invalid_request(None, "Malformed notification"));
        }

        let request: Request = serde_json::from_value(value)
            .map_err(|_| RpcError::invalid_request(None, "Malformed request"))?;
        if request.method.is_empty() {
            return Err(RpcError::invalid_request(
                Some(request.id),
                "method cannot be empty",
            ));
        }
        Ok(Self::Request(request))
    }
}

/// Successful answer to a [`Request`].
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    jsonrpc: &'static str,
    /// Id of the request answered.
    pub id: RequestId,
    /// Method result.
    pub result: Value,
}

impl Response {
    /// Wraps a method result.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// JSON-RPC error codes the server answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Input is not JSON.
    ParseError = -32700,
    /// JSON is not a valid message, or arrives at the wrong lifecycle stage.
    InvalidRequest = -32600,
    /// Unknown method.
    MethodNotFound = -32601,
    /// Missing or malformed params.
    InvalidParams = -32602,
    /// The server failed to build its answer.
    InternalError = -32603,
}

/// Code and message of an [`RpcError`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Numeric JSON-RPC code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}

/// Failed answer, or a rejection of an unparseable line.
#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    jsonrpc: &'static str,
    /// Id of the request, when it could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Code and message.
    pub error: ErrorBody,
}

impl RpcError {
    /// Builds an error answer.
    #[must_use]
    pub fn new(id: Option<RequestId>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: ErrorBody {
                code: code as i32,
                message: message.into(),
            },
        }
    }

    /// Input was not JSON.
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(None, ErrorCode::ParseError, "Parse error")
    }

    /// Message is not acceptable here.
    #[must_use]
    pub fn invalid_request(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::InvalidRequest, message)
    }

    /// Unknown method.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            ErrorCode::MethodNotFound,
            format!("Method not found: {method}"),
        )
    }

    /// Bad params.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), ErrorCode::InvalidParams, message)
    }

    /// Server-side failure.
    #[must_use]
    pub fn internal(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(Some(id), ErrorCode::InternalError, message)
    }

    /// Numeric code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.error.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(line: &str) -> Request {
        match Incoming::parse(line).unwrap() {
            Incoming::Request(req) => req,
            Incoming::Notification(note) => panic!("unexpected notification {}", note.method),
        }
    }

    #[test]
    fn integer_and_string_ids() {
        let req = request(r#"{"jsonrpc": "2.0", "id": 1, "method": "tools/list"}"#);
        assert_eq!(req.id, RequestId::Number(1));
        assert!(req.params.is_none());

        let req = request(r#"{"jsonrpc": "2.0", "id": "calc-7", "method": "ping"}"#);
        assert_eq!(req.id, RequestId::String("calc-7".to_string()));
    }

    #[test]
    fn message_without_id_is_a_notification() {
        let msg = Incoming::parse(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .unwrap();
        assert!(matches!(msg, Incoming::Notification(_)));
        assert_eq!(msg.method(), "notifications/initialized");
    }

    #[test]
    fn rejects_non_json_and_wrong_version() {
        assert_eq!(
            Incoming::parse("width=600").unwrap_err().code(),
            ErrorCode::ParseError as i32
        );
        assert_eq!(
            Incoming::parse("[1, 2]").unwrap_err().code(),
            ErrorCode::ParseError as i32
        );
        for line in [
            r#"{"id": 1, "method": "ping"}"#,
            r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#,
        ] {
            assert_eq!(
                Incoming::parse(line).unwrap_err().code(),
                ErrorCode::InvalidRequest as i32
            );
        }
    }

    #[test]
    fn empty_method_keeps_the_id() {
        let err = Incoming::parse(r#"{"jsonrpc": "2.0", "id": 3, "method": ""}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest as i32);
        assert_eq!(err.id, Some(RequestId::Number(3)));
    }

    #[test]
    fn typed_params() {
        #[derive(Debug, Deserialize)]
        struct Call {
            name: String,
        }

        let req = request(
            r#"{"jsonrpc": "2.0", "id": 7, "method": "tools/call",
                "params": {"name": "get_catalog", "arguments": {}}}"#,
        );
        let call: Call = req.params_as("tool call").unwrap();
        assert_eq!(call.name, "get_catalog");

        let bare = request(r#"{"jsonrpc": "2.0", "id": 8, "method": "tools/call"}"#);
        let err = bare.params_as::<Call>("tool call").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams as i32);
        assert_eq!(err.error.message, "Missing tool call params");
    }

    #[test]
    fn answers_serialise_with_version() {
        let ok = serde_json::to_value(Response::new(
            RequestId::Number(1),
            serde_json::json!({"is_valid": true}),
        ))
        .unwrap();
        assert_eq!(ok["jsonrpc"], "2.0");
        assert_eq!(ok["result"]["is_valid"], true);

        let err = serde_json::to_value(RpcError::method_not_found(
            RequestId::Number(2),
            "cabinet/paint",
        ))
        .unwrap();
        assert_eq!(err["error"]["code"], -32601);
        assert_eq!(err["error"]["message"], "Method not found: cabinet/paint");

        let unparsed = serde_json::to_value(RpcError::parse_error()).unwrap();
        assert!(unparsed.get("id").is_none());
    }
}
