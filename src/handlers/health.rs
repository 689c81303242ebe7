use actix_web::{web, HttpResponse, Result};
use crate::models::HealthBody;

pub async fn health_check() -> Result<HttpResponse> {
    let response = HealthBody { status: "ok".to_string() };
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
