use actix_web::{get, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

/// Liveness probe. Reports the service name, crate version, and current time.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(Health {
        status: "ok",
        service: "taskman",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
