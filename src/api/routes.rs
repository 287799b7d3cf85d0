use actix_web::{web, HttpResponse};

use crate::api::handlers::{health_handler, root_handler, send_email_handler};
use crate::error::SendError;
use crate::models::response::ApiResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root_handler))
        .route("/health", web::get().to(health_handler))
        .route("/send-email", web::post().to(send_email_handler));
}

/// JSON extractor configuration: a body that fails to deserialize still
/// answers with transport-level 200 and a validation envelope, keeping the
/// response shape uniform for every outcome.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let envelope = ApiResponse::failure(&SendError::Validation(err.to_string()));
        actix_web::error::InternalError::from_response(err, HttpResponse::Ok().json(envelope))
            .into()
    })
}
