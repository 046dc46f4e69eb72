//! End-to-end gateway calls against a loopback System I.

use std::sync::Arc;
use std::time::Duration;

use systemi_gateway::config::{Framing, GatewayConfig};
use systemi_gateway::gateway::Gateway;
use systemi_gateway::net::TcpTransport;
use systemi_gateway::operations::collection::CollectionDetailRequest;
use systemi_gateway::operations::consent::UpdateConsentRequest;
use systemi_gateway::operations::self_service::MyCardRequest;
use systemi_gateway::operations::{CollectionDetail, MyCard, MyCardAll, UpdateConsent};
use systemi_gateway::routing::DestinationRouter;
use systemi_gateway::ErrorKind;

mod common;
use common::{body_of, config_for, reply_to, start_system_i, Reply};

const THAI_NAME: &str = "\u{0E2A}\u{0E21}\u{0E0A}\u{0E32}\u{0E22} \u{0E43}\u{0E08}\u{0E14}\u{0E35}";

fn gateway(config: &GatewayConfig) -> (Gateway, Arc<TcpTransport>) {
    let router = DestinationRouter::new(config.routes.clone(), config.destinations.clone());
    let transport = Arc::new(TcpTransport::new(&config.transport));
    (Gateway::new(Arc::new(router), transport.clone()), transport)
}

fn my_card_all_body() -> String {
    format!("{:<20}{:<30}{:<30}000", "3100700000001", "SOMCHAI JAIDEE", THAI_NAME)
}

fn consent_request() -> UpdateConsentRequest {
    serde_json::from_value(serde_json::json!({
        "IDCardNo": "3100700000001",
        "Channel": "MOB",
        "ActionChannel": "MOB",
        "ActionDateTime": "20250820123456",
        "IPAddress": "10.1.1.1",
        "TotalOfConsentCode": 1,
        "ConsentLists": [{"ConsentForm": "F01", "ConsentCode": "C01", "ConsentFormVersion": "1.0", "ConsentLanguage": "T", "ConsentStatus": "Y"}]
    }))
    .unwrap()
}

#[tokio::test]
async fn thai_text_survives_the_round_trip() {
    let backend = start_system_i(Framing::LengthPrefixed, |request| {
        Reply::Message(reply_to(request, "", "", &my_card_all_body()))
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let (gateway, transport) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let response = gateway.execute::<MyCardAll>("RQ1", &request).await.unwrap();

    assert_eq!(response.customer_name_en, "SOMCHAI JAIDEE");
    assert_eq!(response.customer_name_th, THAI_NAME);
    assert!(response.cards.is_empty());
    assert_eq!(transport.tracker().active_count(), 0);

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    let header: String = sent[0].chars().take(48).collect();
    assert_eq!(header, format!("{:<10}{:<15}{:<3}{:<20}", "SYSI", "MYCARDALL", "FX1", "RQ1"));
    assert_eq!(body_of(&sent[0]), format!("{:<20}YY", "3100700000001"));
}

#[tokio::test]
async fn unframed_destination() {
    let backend = start_system_i(Framing::Unframed, |request| {
        let body = format!("{:<20}{:<20}00{}", "3100700000001", "", " ".repeat(80));
        Reply::Message(reply_to(request, "", "", &body))
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::Unframed, 5);
    let (gateway, _) = gateway(&config);

    let response = gateway.execute::<UpdateConsent>("RQ2", &consent_request()).await.unwrap();
    assert_eq!(response.status, "C");
    assert_eq!(body_of(&backend.requests()[0]).chars().count(), 281 + 22);
}

#[tokio::test]
async fn unframed_reply_is_cut_at_the_read_buffer() {
    let backend = start_system_i(Framing::Unframed, |request| {
        let mut body = format!("{:<20}{:04}", "3100700000001", 3);
        for number in ["4111222233334444", "5500111122223333", "3528000011112222"] {
            body.push_str(&format!("{:<16}{:<30}01CC00{:<8}Y", number, "PLATINUM", "20991231"));
        }
        Reply::Message(reply_to(request, "", "", &body))
    })
    .await;
    let mut config = config_for(backend.addr.port(), Framing::Unframed, 5);
    // Header, card count and one full card plus half of the next.
    config.transport.unframed_buffer_bytes = 123 + 24 + 61 + 30;
    let (gateway, _) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let response = gateway.execute::<MyCard>("RQ9", &request).await.unwrap();

    assert_eq!(response.total_credit_card, 3);
    assert_eq!(response.cards.len(), 1);
    assert_eq!(response.cards[0].credit_card_no, "411122XXXXXX4444");
}

#[tokio::test]
async fn known_business_code_is_mapped() {
    let backend = start_system_i(Framing::LengthPrefixed, |request| {
        Reply::Message(reply_to(request, "SVC117", "ID CARD NOT FOUND", ""))
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let (gateway, _) = gateway(&config);

    let request = CollectionDetailRequest { id_card_no: "3100700000001".into(), ..Default::default() };
    let err = gateway.execute::<CollectionDetail>("RQ3", &request).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::IdCardNotFound);
    assert_eq!(err.client_message(), "ID Card No. Not Found");
    let raw = err.downstream.unwrap();
    assert_eq!((raw.code.as_str(), raw.message.as_str()), ("SVC117", "ID CARD NOT FOUND"));
}

#[tokio::test]
async fn unknown_code_is_unexpected_downstream() {
    let backend = start_system_i(Framing::LengthPrefixed, |request| {
        Reply::Message(reply_to(request, "SVC777", "NEW FAILURE", ""))
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let (gateway, _) = gateway(&config);

    let err = gateway
        .execute::<UpdateConsent>("RQ4", &consent_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedDownstream);
    assert_eq!(err.kind.http_status(), 400);
}

#[tokio::test]
async fn refused_dial_is_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = config_for(port, Framing::LengthPrefixed, 5);
    let (gateway, _) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let err = gateway.execute::<MyCardAll>("RQ5", &request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert_eq!(err.kind.http_status(), 504);
}

#[tokio::test]
async fn silent_backend_hits_the_deadline() {
    let backend = start_system_i(Framing::LengthPrefixed, |_| Reply::Hang).await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 1);
    let (gateway, transport) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let started = std::time::Instant::now();
    let err = gateway.execute::<MyCardAll>("RQ6", &request).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(transport.tracker().active_count(), 0);
}

#[tokio::test]
async fn early_close_is_service_unavailable() {
    let backend = start_system_i(Framing::LengthPrefixed, |_| Reply::Close).await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let (gateway, transport) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let err = gateway.execute::<MyCardAll>("RQ7", &request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(transport.tracker().active_count(), 0);
}

#[tokio::test]
async fn truncated_response_is_internal_error() {
    let backend = start_system_i(Framing::LengthPrefixed, |request| {
        Reply::Message(request.chars().take(40).collect())
    })
    .await;
    let config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    let (gateway, _) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let err = gateway.execute::<MyCardAll>("RQ8", &request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InternalServer);
}

#[tokio::test]
async fn unrouted_operation_is_configuration_error() {
    let backend = start_system_i(Framing::LengthPrefixed, |_| Reply::Close).await;
    let mut config = config_for(backend.addr.port(), Framing::LengthPrefixed, 5);
    config.routes.remove("POST:/Api/SelfService/MyCardAll");
    let (gateway, _) = gateway(&config);

    let request = MyCardRequest { user_ref: "3100700000001".into() };
    let err = gateway.execute::<MyCardAll>("RQ9", &request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(backend.requests().is_empty());
}
