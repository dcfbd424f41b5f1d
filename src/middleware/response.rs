use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::api::hal::HAL_JSON;

/// HAL response with a status and, for created resources, a Location header
#[derive(Debug)]
pub struct Hal<T: Serialize> {
    pub body: T,
    pub status: StatusCode,
    pub location: Option<String>,
}

impl<T: Serialize> Hal<T> {
    /// 200 OK
    pub fn ok(body: T) -> Self {
        Self {
            body,
            status: StatusCode::OK,
            location: None,
        }
    }

    /// 201 Created, pointing Location at the new resource
    pub fn created(body: T, location: Option<String>) -> Self {
        Self {
            body,
            status: StatusCode::CREATED,
            location,
        }
    }
}

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        let bytes = match serde_json::to_vec(&self.body) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "message": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        let mut response = (self.status, bytes).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
        if let Some(location) = self.location.and_then(|l| HeaderValue::from_str(&l).ok()) {
            headers.insert(header::LOCATION, location);
        }
        response
    }
}

/// 204 No Content
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
