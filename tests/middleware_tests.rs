use std::sync::Arc;

use actix_web::{test, web, App, HttpResponse};
use forklift::worker::{InFlightTracker, Watchdog};
use tempfile::tempdir;

async fn teapot() -> HttpResponse {
    HttpResponse::ImATeapot()
        .insert_header(("X-App-Header", "untouched"))
        .body("short and stout")
}

async fn boom() -> HttpResponse {
    HttpResponse::InternalServerError().body("handler failure")
}

#[actix_rt::test]
async fn response_passes_through_unaltered() {
    let dir = tempdir().unwrap();
    let tracker = Arc::new(InFlightTracker::new(dir.path().join("worker-0")));

    let app = test::init_service(
        App::new()
            .wrap(Watchdog::new(tracker.clone()))
            .route("/", web::get().to(teapot)),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    // The launcher must not alter status, headers or body
    assert_eq!(resp.status().as_u16(), 418);
    assert_eq!(
        resp.headers().get("X-App-Header").unwrap().to_str().unwrap(),
        "untouched"
    );
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"short and stout");
}

#[actix_rt::test]
async fn in_flight_table_empties_after_each_request() {
    let dir = tempdir().unwrap();
    let tracker = Arc::new(InFlightTracker::new(dir.path().join("worker-0")));

    let app = test::init_service(
        App::new()
            .wrap(Watchdog::new(tracker.clone()))
            .route("/", web::get().to(teapot)),
    )
    .await;

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/").to_request();
        let _resp = test::call_service(&app, req).await;
    }

    assert_eq!(tracker.in_flight(), 0);
    assert_eq!(tracker.oldest(), None);
}

#[actix_rt::test]
async fn error_responses_also_clear_the_table() {
    let dir = tempdir().unwrap();
    let tracker = Arc::new(InFlightTracker::new(dir.path().join("worker-0")));

    let app = test::init_service(
        App::new()
            .wrap(Watchdog::new(tracker.clone()))
            .route("/boom", web::get().to(boom)),
    )
    .await;

    let req = test::TestRequest::get().uri("/boom").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(tracker.in_flight(), 0);
}

#[actix_rt::test]
async fn heartbeat_file_reflects_request_lifecycle() {
    let dir = tempdir().unwrap();
    let heartbeat = dir.path().join("worker-0");
    let tracker = Arc::new(InFlightTracker::new(&heartbeat));

    let app = test::init_service(
        App::new()
            .wrap(Watchdog::new(tracker.clone()))
            .route("/", web::get().to(teapot)),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let _resp = test::call_service(&app, req).await;

    // Idle again: the heartbeat file exists and is empty
    let content = std::fs::read_to_string(&heartbeat).unwrap();
    assert!(content.is_empty());
}
