use actix_web::HttpResponse;
use serde_json::json;

/// GET /health, outside the session gate.
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}
