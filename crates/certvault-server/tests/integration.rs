use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tower::ServiceExt;

use certvault_core::Ledger;
use certvault_server::routes::{AppState, build_router, cors_layer};

const YELLOW_HOUSE: &str = r#"{"ID": "c003","Title": "The Yellow House","CreatedAt": "2009-11-17T20:34:58.651387237Z","OwnerID": "rr01","Year": 1888,"Note": "","Transfer": {"To": "","Status": ""}}"#;
const TO_VVG: &str = r#"{"To": "vvg@gmail.com","Status": "pending"}"#;

fn app() -> axum::Router {
    build_router(AppState {
        ledger: Ledger::seeded().unwrap(),
    })
}

fn basic(id: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{id}:{secret}")))
}

/// Send a request to the app and return (status, body text).
async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    for &(name, value) in headers {
        builder = builder.header(name, value);
    }
    let body = body.map_or_else(Body::empty, |b| Body::from(b.to_owned()));
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

async fn propose(app: &axum::Router, cert: &str, id: &str, secret: &str) -> StatusCode {
    let auth = basic(id, secret);
    send(
        app,
        Method::POST,
        &format!("/certificates/{cert}/transfers/create"),
        &[("authorization", auth.as_str())],
        Some(TO_VVG),
    )
    .await
    .0
}

async fn accept(app: &axum::Router, cert: &str, id: &str, secret: &str) -> (StatusCode, String) {
    let auth = basic(id, secret);
    send(
        app,
        Method::PUT,
        &format!("/certificates/{cert}/transfers/accept"),
        &[("authorization", auth.as_str())],
        None,
    )
    .await
}

// === Certificates ===

#[tokio::test]
async fn list_all_certificates() {
    let (status, text) = send(&app(), Method::GET, "/certificates", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&text).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_existing_certificate() {
    let (status, text) = send(&app(), Method::GET, "/certificates/c001", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let cert = json(&text);
    assert_eq!(cert["ID"], "c001");
    assert_eq!(cert["CreatedAt"], "2009-11-17T20:34:58.651387237Z");
}

#[tokio::test]
async fn get_missing_certificate() {
    let (status, _) = send(&app(), Method::GET, "/certificates/c-1", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_certificate_with_owner_header() {
    let app = app();
    let (status, text) = send(
        &app,
        Method::POST,
        "/certificates/create",
        &[("OwnerID", "vvg01")],
        Some(YELLOW_HOUSE),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cert = json(&text);
    assert_eq!(cert["ID"], "c003");
    assert_eq!(cert["Title"], "The Yellow House");
    assert_eq!(cert["OwnerID"], "vvg01", "owner comes from the header");

    let (status, _) = send(&app, Method::GET, "/certificates/c003", &[], None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_certificate_without_owner() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/certificates/create",
        &[],
        Some(YELLOW_HOUSE),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn create_certificate_bad_json() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/certificates/create",
        &[("OwnerID", "rr01")],
        Some(r#"{"ID": 12"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_existing_certificate() {
    let app = app();
    let body = r#"{"ID": "c001","Title": "THE STARRY NIGHT","CreatedAt": "2009-11-17T20:34:58.651387237Z","OwnerID": "rr01","Year": 1889,"Note": "","Transfer": {"To": "","Status": ""}}"#;
    let (status, text) = send(&app, Method::PUT, "/certificates/update", &[], Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&text)["Title"], "THE STARRY NIGHT");

    let (_, text) = send(&app, Method::GET, "/certificates/c001", &[], None).await;
    assert_eq!(json(&text)["Title"], "THE STARRY NIGHT");
}

#[tokio::test]
async fn update_cannot_change_owner() {
    let app = app();
    let body = r#"{"ID": "c001","Title": "The Starry Night","OwnerID": "vvg01","Year": 1889}"#;
    let (status, _) = send(&app, Method::PUT, "/certificates/update", &[], Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, text) = send(&app, Method::GET, "/certificates/c001", &[], None).await;
    assert_eq!(json(&text)["OwnerID"], "rr01");
}

#[tokio::test]
async fn update_missing_certificate_creates_it() {
    let app = app();
    let (status, text) = send(
        &app,
        Method::PUT,
        "/certificates/update",
        &[("OwnerID", "rr01")],
        Some(YELLOW_HOUSE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&text)["ID"], "c003");

    let (_, text) = send(&app, Method::GET, "/certificates", &[], None).await;
    assert_eq!(json(&text)[2]["Title"], "The Yellow House");
}

#[tokio::test]
async fn update_missing_certificate_without_owner() {
    let (status, _) = send(
        &app(),
        Method::PUT,
        "/certificates/update",
        &[],
        Some(YELLOW_HOUSE),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn delete_certificate() {
    let app = app();
    let (status, text) = send(&app, Method::DELETE, "/certificates/c002/delete", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "200 Delete Successful");

    let (status, _) = send(&app, Method::DELETE, "/certificates/c002/delete", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Users ===

#[tokio::test]
async fn user_certificates() {
    let (status, text) = send(&app(), Method::GET, "/users/vvg01/certificates", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let certs = json(&text);
    assert_eq!(certs.as_array().unwrap().len(), 1);
    assert_eq!(certs[0]["ID"], "c002");
}

#[tokio::test]
async fn unknown_user_certificates() {
    let (status, _) = send(&app(), Method::GET, "/users/kh01/certificates", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Transfers ===

#[tokio::test]
async fn create_transfer() {
    let app = app();
    assert_eq!(propose(&app, "c001", "rr01", "rrejh3294").await, StatusCode::CREATED);

    let (_, text) = send(&app, Method::GET, "/certificates/c001", &[], None).await;
    let cert = json(&text);
    assert_eq!(cert["Transfer"]["Status"], "pending");
    assert_eq!(cert["Transfer"]["To"], "vvg@gmail.com");
}

#[tokio::test]
async fn create_transfer_bad_credentials() {
    let app = app();
    assert_eq!(propose(&app, "c001", "rr01", "rr").await, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/certificates/c001/transfers/create",
        &[],
        Some(TO_VVG),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_transfer_bad_json() {
    let auth = basic("rr01", "rrejh3294");
    let (status, _) = send(
        &app(),
        Method::POST,
        "/certificates/c001/transfers/create",
        &[("authorization", auth.as_str())],
        Some("{"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_transfer_missing_certificate() {
    assert_eq!(
        propose(&app(), "c-", "rr01", "rrejh3294").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn create_transfer_not_owner() {
    let app = app();
    assert_eq!(propose(&app, "c001", "vvg01", "vwh39043f").await, StatusCode::FORBIDDEN);

    let (_, text) = send(&app, Method::GET, "/certificates/c001", &[], None).await;
    assert_eq!(json(&text)["Transfer"]["To"], "");
}

#[tokio::test]
async fn accept_transfer() {
    let app = app();
    assert_eq!(propose(&app, "c001", "rr01", "rrejh3294").await, StatusCode::CREATED);

    let (status, text) = accept(&app, "c001", "vvg01", "vwh39043f").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Transfer Accepted");

    let (_, text) = send(&app, Method::GET, "/certificates/c001", &[], None).await;
    let cert = json(&text);
    assert_eq!(cert["OwnerID"], "vvg01");
    assert_eq!(cert["Transfer"]["Status"], "Accepted");

    let (_, text) = send(&app, Method::GET, "/users/vvg01/certificates", &[], None).await;
    assert_eq!(json(&text).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn accept_transfer_bad_credentials() {
    let app = app();
    assert_eq!(propose(&app, "c001", "rr01", "rrejh3294").await, StatusCode::CREATED);
    let (status, _) = accept(&app, "c001", "vvg01", "vvg").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn accept_transfer_not_proposed() {
    let (status, _) = accept(&app(), "c002", "vvg01", "vwh39043f").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn accept_transfer_not_intended_for_user() {
    let app = app();
    assert_eq!(propose(&app, "c002", "vvg01", "vwh39043f").await, StatusCode::CREATED);

    let (status, text) = accept(&app, "c002", "rr01", "rrejh3294").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(text.contains("not intended for this user"), "body: {text}");

    let (status, _) = accept(&app, "c002", "vvg01", "vwh39043f").await;
    assert_eq!(status, StatusCode::OK);
}

// === Plumbing ===

#[tokio::test]
async fn health_reports_ok() {
    let (status, text) = send(&app(), Method::GET, "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&text)["status"], "ok");
}

#[tokio::test]
async fn cors_preflight_allows_configured_methods() {
    let app = app().layer(cors_layer(&["*".to_string()]));
    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/certificates/c001/delete")
                .header("origin", "https://gallery.example")
                .header("access-control-request-method", "DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_echoes_explicitly_allowed_origin() {
    let app = app().layer(cors_layer(&[
        "https://gallery.example".to_string(),
        "bad\norigin".to_string(),
    ]));
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/certificates/update")
            .header("origin", origin)
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap()
    };

    let resp = app
        .clone()
        .oneshot(preflight("https://gallery.example"))
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .unwrap()
            .to_str()
            .unwrap(),
        "https://gallery.example"
    );

    let resp = app.oneshot(preflight("https://other.example")).await.unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
