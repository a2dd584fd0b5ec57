//! HTTP Error Mapping
//!
//! One boundary type, [`ApiError`], carrying the service error taxonomy into
//! status codes:
//!
//! - absence (map, node, connection) and unresolvable identity → 404
//! - validation failures and empty-graph analysis → 422
//! - storage faults → 500 with a generic body (details stay in the logs)

use crate::services::MapServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] MapServiceError),

    /// No resolvable identity on the request. Deliberately 404-shaped, not
    /// 401: an anonymous caller learns nothing about what exists.
    #[error("Not found")]
    UnresolvedIdentity,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::UnresolvedIdentity => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Service(err) => match err {
                MapServiceError::MapNotFound { .. }
                | MapServiceError::NodeNotFound { .. }
                | MapServiceError::ConnectionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                MapServiceError::EmptyGraph | MapServiceError::Validation(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
                }
                MapServiceError::Database(db_err) => {
                    error!(error = %db_err, "storage failure serving request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absence_maps_to_404() {
        let response = ApiError::from(MapServiceError::map_not_found("m-1")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::UnresolvedIdentity.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_empty_graph_maps_to_422() {
        let response = ApiError::from(MapServiceError::EmptyGraph).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
