//! # Errors
//!
//! Structured errors for everything that talks to the clinic backend.
//! Core goals:
//! - one kind per failure class the UI reacts to (network, auth, validation, server)
//! - status codes + class names mirror the backend's HTTP answers
//! - can be carried through `anyhow::Error` so call sites just use `?`
//!
//! Only `NotAuthenticated` is handled centrally (by the request client);
//! every other kind is surfaced to the caller unchanged.

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::{Map, Value};

/// A convenience result type for Psico client APIs.
pub type PsicoResult<T> = std::result::Result<T, AnyError>;

/// Error classes with their HTTP status codes.
///
/// `Network` has no status: the request never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,            // transport
    BadRequest,         // 400
    NotAuthenticated,   // 401
    Forbidden,          // 403
    NotFound,           // 404
    MethodNotAllowed,   // 405
    Timeout,            // 408 / client timeout
    Conflict,           // 409
    Unprocessable,      // 422
    TooManyRequests,    // 429
    GeneralError,       // 500
    NotImplemented,     // 501
    BadGateway,         // 502
    Unavailable,        // 503
}

impl ErrorKind {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ErrorKind::Network => None,
            ErrorKind::BadRequest => Some(400),
            ErrorKind::NotAuthenticated => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::MethodNotAllowed => Some(405),
            ErrorKind::Timeout => Some(408),
            ErrorKind::Conflict => Some(409),
            ErrorKind::Unprocessable => Some(422),
            ErrorKind::TooManyRequests => Some(429),
            ErrorKind::GeneralError => Some(500),
            ErrorKind::NotImplemented => Some(501),
            ErrorKind::BadGateway => Some(502),
            ErrorKind::Unavailable => Some(503),
        }
    }

    /// Map an HTTP status to a kind. Unlisted 4xx become `BadRequest`,
    /// unlisted 5xx become `GeneralError`.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::NotAuthenticated,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            405 => ErrorKind::MethodNotAllowed,
            408 => ErrorKind::Timeout,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::Unprocessable,
            429 => ErrorKind::TooManyRequests,
            501 => ErrorKind::NotImplemented,
            502 => ErrorKind::BadGateway,
            503 => ErrorKind::Unavailable,
            s if (400..500).contains(&s) => ErrorKind::BadRequest,
            _ => ErrorKind::GeneralError,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Network",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotAllowed => "MethodNotAllowed",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::TooManyRequests => "TooManyRequests",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::NotImplemented => "NotImplemented",
            ErrorKind::BadGateway => "BadGateway",
            ErrorKind::Unavailable => "Unavailable",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::MethodNotAllowed => "method-not-allowed",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::TooManyRequests => "too-many-requests",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::NotImplemented => "not-implemented",
            ErrorKind::BadGateway => "bad-gateway",
            ErrorKind::Unavailable => "unavailable",
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self.status_code(), Some(s) if s >= 500)
    }
}

/// A structured client error that can live inside `anyhow::Error`.
///
/// - kind (drives status code / class name)
/// - message (what a notification would show)
/// - errors (structured field errors from 4xx bodies, if any)
/// - source (transport error, dropped by `sanitize_for_display`)
#[derive(Debug)]
pub struct PsicoError {
    pub kind: ErrorKind,
    pub message: String,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl PsicoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> Option<u16> {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// 4xx answers that carry per-field messages.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::BadRequest | ErrorKind::Unprocessable)
            && self.errors.as_ref().is_some_and(Value::is_object)
    }

    /// Field errors as `field -> messages`, flattening the backend's
    /// `{"field": ["msg", ...]}` and `{"field": "msg"}` shapes.
    pub fn field_errors(&self) -> Vec<(String, Vec<String>)> {
        let Some(Value::Object(map)) = &self.errors else {
            return Vec::new();
        };
        map.iter()
            .map(|(field, v)| {
                let msgs = match v {
                    Value::Array(items) => items
                        .iter()
                        .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                        .collect(),
                    Value::String(s) => vec![s.clone()],
                    other => vec![other.to_string()],
                };
                (field.clone(), msgs)
            })
            .collect()
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `PsicoError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&PsicoError> {
        err.downcast_ref::<PsicoError>()
    }

    /// Turn any error into a PsicoError:
    /// - if it's already a PsicoError, keep it
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> PsicoError {
        match err.downcast::<PsicoError>() {
            Ok(e) => e,
            Err(other) => PsicoError::new(ErrorKind::GeneralError, other.to_string()).with_source(other),
        }
    }

    /// Copy without the inner `source`, suitable for showing to a user.
    pub fn sanitize_for_display(&self) -> PsicoError {
        PsicoError {
            kind: self.kind,
            message: self.message.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut base = Map::new();
        base.insert("name".into(), Value::from(self.name()));
        base.insert("message".into(), Value::from(self.message.clone()));
        base.insert("code".into(), self.code().map(Value::from).unwrap_or(Value::Null));
        base.insert("className".into(), Value::from(self.class_name()));
        if let Some(e) = &self.errors {
            base.insert("errors".into(), e.clone());
        }
        Value::Object(base)
    }

    // ---- Constructors ----

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, msg)
    }
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, msg)
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for PsicoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{} ({}): {}", self.name(), code, self.message),
            None => write!(f, "{}: {}", self.name(), self.message),
        }
    }
}

impl std::error::Error for PsicoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Bail with a `PsicoError` from a function returning `PsicoResult`.
#[macro_export]
macro_rules! bail_psico {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::PsicoError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::PsicoError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}
