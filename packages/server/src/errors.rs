//! HTTP mapping for admin errors and unreadable request bodies.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use arrest_map_admin::AdminError;
use arrest_map_server_models::ApiError;

/// Status code for an admin error.
#[must_use]
pub const fn status_for(error: &AdminError) -> StatusCode {
    match error {
        AdminError::Validation(_) => StatusCode::BAD_REQUEST,
        AdminError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        AdminError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AdminError::PermissionDenied => StatusCode::FORBIDDEN,
        AdminError::UpdateFailed
        | AdminError::DeleteFailed
        | AdminError::LoadFailed
        | AdminError::AddMediaFailed
        | AdminError::DeleteMediaFailed
        | AdminError::LoadMediaFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body with the error's fixed message.
#[must_use]
pub fn error_response(error: &AdminError) -> HttpResponse {
    HttpResponse::build(status_for(error)).json(ApiError {
        error: error.to_string(),
    })
}

/// Message for a body that is not the JSON shape an endpoint expects.
pub const INVALID_BODY: &str = "Invalid request body";

/// Answers an unreadable JSON body with a generic 400 [`ApiError`]. The
/// parser's own message is only logged.
pub fn json_error(error: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected body for {}: {error}", req.path());
    let response = HttpResponse::BadRequest().json(ApiError {
        error: INVALID_BODY.to_string(),
    });
    InternalError::from_response(error, response).into()
}

#[cfg(test)]
mod tests {
    use arrest_map_stats::ValidationError;

    use super::*;

    #[test]
    fn maps_each_class_of_error() {
        assert_eq!(
            status_for(&AdminError::Validation(ValidationError::EmptyBatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AdminError::ServiceUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_for(&AdminError::NotAuthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AdminError::PermissionDenied), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&AdminError::UpdateFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn unreadable_body_hides_the_parser_message() {
        let req = actix_web::test::TestRequest::post()
            .uri("/api/admin/records")
            .to_http_request();
        let error = json_error(JsonPayloadError::ContentType, &req);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, INVALID_BODY);
    }

    #[test]
    fn body_carries_the_generic_message() {
        let response = error_response(&AdminError::DeleteFailed);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
