//! HTTP surface: headers, body validation, error rendering, shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use systemi_gateway::config::Framing;
use systemi_gateway::gateway::Gateway;
use systemi_gateway::http::{AppState, HttpServer};
use systemi_gateway::lifecycle::{build_state, Shutdown};
use systemi_gateway::net::TransportError;
use systemi_gateway::routing::DestinationRouter;
use systemi_gateway::security::ApiKeyRepository;

mod common;
use common::{config_for, reply_to, start_system_i, Reply, StubTransport, API_KEY};

const MY_CARD: &str = "/Api/SelfService/MyCard";
const MY_CARD_ALL: &str = "/Api/SelfService/MyCardAll";
const UPDATE_CONSENT: &str = "/Api/Consent/UpdateConsent";

fn app(replies: Vec<Result<String, TransportError>>) -> (Router, Arc<StubTransport>) {
    let config = config_for(7000, Framing::LengthPrefixed, 5);
    let router = DestinationRouter::new(config.routes.clone(), config.destinations.clone());
    let transport = Arc::new(StubTransport::new(replies));
    let state = AppState {
        gateway: Gateway::new(Arc::new(router), transport.clone()),
        api_keys: Arc::new(ApiKeyRepository::new(config.api_keys.clone())),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    };
    (HttpServer::new(state).router(), transport)
}

fn post(path: &str) -> axum::http::request::Builder {
    post_with_key(path, API_KEY)
}

fn post_with_key(path: &str, key: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header("Api-Key", key)
        .header("Api-RequestID", "REQ-0001")
        .header("Api-Channel", "MOB")
        .header("Api-DeviceOS", "iOS")
}

async fn json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn backend_reply(body: &str) -> String {
    let request = format!("{:<10}{:<15}{:<3}{:<20}", "SYSI", "MYCARDALL", "FX1", "REQ-0001");
    reply_to(&request, "", "", body)
}

#[tokio::test]
async fn health_is_open() {
    let (app, _) = app(vec![]);
    let response = app
        .oneshot(Request::builder().uri("/Api/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn successful_call_returns_decoded_json() {
    let body = format!("{:<20}{:<30}{:<30}000", "3100700000001", "SOMCHAI JAIDEE", "");
    let (app, transport) = app(vec![Ok(backend_reply(&body))]);

    let request = post(MY_CARD_ALL).body(Body::from(r#"{"UserRef":"3100700000001"}"#)).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["api-requestid"], "REQ-0001");
    let payload = json(response).await;
    assert_eq!(payload["IDCardNo"], "3100700000001");
    assert_eq!(payload["CustomerNameEN"], "SOMCHAI JAIDEE");
    assert_eq!(payload["TotalCreditCard"], 0);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent[0].0.address, "127.0.0.1:7000");
    assert!(sent[0].1.contains("REQ-0001"));
}

#[tokio::test]
async fn wrong_key_is_401() {
    let (app, transport) = app(vec![]);
    let request = post_with_key(MY_CARD_ALL, "other")
        .body(Body::from(r#"{"UserRef":"1"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(response).await, serde_json::json!({"Code": "SYS002", "Message": "Unauthorized"}));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_channel_is_rejected() {
    let (app, _) = app(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri(MY_CARD_ALL)
        .header("Api-Key", API_KEY)
        .header("Api-DeviceOS", "iOS")
        .body(Body::from(r#"{"UserRef":"1"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let generated = response.headers()["api-requestid"].to_str().unwrap().to_string();
    assert!(generated.starts_with("RQ") && generated.len() == 20);
    assert_eq!(json(response).await["Code"], "COM002");
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let (app, _) = app(vec![]);
    let response = app.oneshot(post(MY_CARD_ALL).body(Body::from("{not json")).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["Code"], "VAL400");
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let (app, transport) = app(vec![]);
    let request = post(UPDATE_CONSENT)
        .body(Body::from(r#"{"IDCardNo":"3100700000001","Channel":"MOB","TotalOfConsentCode":1}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json(response).await,
        serde_json::json!({"Code": "COM001", "Message": "Required Parameter ActionChannel, ActionDateTime, IPAddress"})
    );
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn over_length_fields_are_rejected_before_sending() {
    let (app, transport) = app(vec![]);
    let body = serde_json::json!({
        "IDCardNo": "1".repeat(25),
        "Channel": "M",
        "ActionChannel": "MOBILE",
        "ActionDateTime": "20250820123456",
        "IPAddress": "10.1.1.1",
        "TotalOfConsentCode": 1,
    });
    let request = post(UPDATE_CONSENT).body(Body::from(body.to_string())).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json(response).await,
        serde_json::json!({
            "Code": "SYS500",
            "Message": "An unexpected internal error occurred: max length (IDCardNo, ActionChannel)"
        })
    );
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_fields_win_over_length() {
    let (app, _) = app(vec![]);
    let request = post(UPDATE_CONSENT)
        .body(Body::from(r#"{"IDCardNo":"1234567890123456789012345","Channel":"MOB","TotalOfConsentCode":1}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(json(response).await["Code"], "COM001");
}

#[tokio::test]
async fn my_card_masks_numbers_and_derives_status() {
    let cards = [
        ("4111222233334444", "PLATINUM", "00", "20991231", "Y"),
        ("5500111122223333", "CLASSIC", "C1", "20200131", " "),
        ("3528000011112222", "GOLD", "B1", "20991231", "N"),
    ];
    let mut body = format!("{:<20}{:04}", "3100700000001", cards.len());
    for (number, name, status, expires, flag) in cards {
        body.push_str(&format!("{:<16}{:<30}{:<2}{:<2}{:<2}{:<8}{:<1}", number, name, "01", "CC", status, expires, flag));
    }
    let (app, transport) = app(vec![Ok(backend_reply(&body))]);

    let request = post(MY_CARD).body(Body::from(r#"{"UserRef":"3100700000001"}"#)).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json(response).await;
    assert_eq!(payload["TotalCreditCard"], 3);
    let list = payload["CardList"].as_array().unwrap();
    let summary: Vec<(&str, &str, &str)> = list
        .iter()
        .map(|card| {
            (
                card["CreditCardNo"].as_str().unwrap(),
                card["CardStatus"].as_str().unwrap(),
                card["DigitalCardFlag"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("411122XXXXXX4444", "ACT", "Y"),
            ("550011XXXXXX3333", "EXP", "N"),
            ("352800XXXXXX2222", "HLD", "N"),
        ]
    );
    assert_eq!(list[0]["CardName"], "PLATINUM");

    let sent = transport.sent.lock().unwrap();
    assert!(sent[0].1.ends_with(&format!("{:<38}", "3100700000001")));
}

#[tokio::test]
async fn request_timeout_answers_with_json() {
    let backend = start_system_i(Framing::LengthPrefixed, |_| Reply::Hang).await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let mut state = build_state(&config);
    state.request_timeout = Duration::from_secs(1);
    let app = HttpServer::new(state).router();

    let request = post(MY_CARD_ALL).body(Body::from(r#"{"UserRef":"3100700000001"}"#)).unwrap();
    let started = std::time::Instant::now();
    let response = app.oneshot(request).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.headers()["api-requestid"], "REQ-0001");
    assert_eq!(json(response).await, serde_json::json!({"Code": "SYS003", "Message": "System Time out"}));
}

#[tokio::test]
async fn transport_failures_render_without_internals() {
    let (app, _) = app(vec![Err(TransportError::Receive {
        address: "127.0.0.1:7000".into(),
        reason: "deadline of 10s exceeded".into(),
        deadline_elapsed: true,
    })]);
    let request = post(MY_CARD_ALL).body(Body::from(r#"{"UserRef":"1"}"#)).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let payload = json(response).await;
    assert_eq!(payload, serde_json::json!({"Code": "SYS003", "Message": "System Time out"}));
}

#[tokio::test]
async fn serves_over_a_socket_until_shutdown() {
    let backend = start_system_i(Framing::LengthPrefixed, |request| {
        let body = format!("{:<20}{:<30}{:<30}000", "3100700000001", "", "");
        Reply::Message(reply_to(request, "", "", &body))
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(build_state(&config));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{}{}", addr, MY_CARD_ALL))
        .header("Api-Key", API_KEY)
        .header("Api-Channel", "MOB")
        .header("Api-DeviceOS", "Android")
        .json(&serde_json::json!({"UserRef": "3100700000001"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let payload: serde_json::Value = res.json().await.unwrap();
    assert_eq!(payload["IDCardNo"], "3100700000001");

    shutdown.trigger();
    let stopped = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(stopped, Ok(Ok(Ok(())))));
}
