#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use seatlock_api::{app, AppState};
use seatlock_core::ReservationEngine;

pub const LOCK_DURATION: Duration = Duration::from_secs(60);

/// Router over a three-seat pool ("A", "B", "C") with the full middleware stack.
pub fn build_test_app() -> Router {
    let engine = ReservationEngine::new(["A", "B", "C"], LOCK_DURATION);
    app(AppState { engine })
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Locks `seat` and returns the lock id from the response.
pub async fn lock(app: &Router, seat: &str) -> String {
    let response = post(app, &format!("/lock/{seat}")).await;
    let json = body_json(response).await;
    json["lockId"].as_str().unwrap().to_string()
}
