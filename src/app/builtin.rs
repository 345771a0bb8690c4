//! Built-in application
//!
//! A minimal health application registered under `builtin:health`. It
//! stands in for the external application collaborator so the standalone
//! binary can serve something; deployments register their own factory with
//! `register_app!` and point `app.entry` at it.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::trace;

use super::register::{register_app_plugin, AppFactory};

pub struct HealthService;

impl HealthService {
    pub async fn index() -> impl Responder {
        trace!("Received index request");
        HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "forklift",
        }))
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::Ok().json(json!({ "status": "alive" }))
    }
}

/// Mount the built-in routes
pub fn mount(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(HealthService::index));
    cfg.route("/health/live", web::get().to(HealthService::liveness_check));
}

#[ctor::ctor]
fn register_builtin_health() {
    use std::sync::Arc;

    register_app_plugin("builtin:health", Arc::new(|| Ok(Arc::new(mount) as AppFactory)));
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn index_reports_ok() {
        let app = test::init_service(App::new().configure(super::mount)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_rt::test]
    async fn liveness_endpoint_mounted() {
        let app = test::init_service(App::new().configure(super::mount)).await;
        let req = test::TestRequest::get().uri("/health/live").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
