use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn missing_parameter_error(name: &str) -> Error {
    Error {
        code: 102,
        message: format!("missing or empty parameter: {}", name),
    }
}

pub fn unknown_vehicle_class_error(token: &str) -> Error {
    Error {
        code: 103,
        message: format!("unknown vehicle class: {}", token),
    }
}

pub fn invalid_interval_error(raw: &str) -> Error {
    Error {
        code: 104,
        message: format!("interval_sec must be a positive integer, got: {}", raw),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn configuration_error(detail: &str) -> Error {
    Error {
        code: 2,
        message: format!("configuration error: {}", detail),
    }
}

pub fn server_error<T: Debug>(err: T) -> Error {
    tracing::error!("server error: {:?}", err);

    Error {
        code: 3,
        message: "server error".into(),
    }
}

#[test]
fn client_errors_map_to_bad_request() {
    let response = unknown_vehicle_class_error("limo").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = missing_parameter_error("origin").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn server_errors_map_to_internal_error() {
    let response = configuration_error("empty provider list").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = server_error("bind failed").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn error_display_includes_code() {
    let err = unknown_vehicle_class_error("limo");
    assert_eq!(err.to_string(), "[103] unknown vehicle class: limo");
}
