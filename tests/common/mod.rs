//! Shared helpers for integration tests: a loopback System I and a
//! scripted in-memory transport.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use systemi_gateway::codec::{tis620, HEADER_LENGTH};
use systemi_gateway::config::{parse_config, Framing, GatewayConfig};
use systemi_gateway::net::framing::encode_frame;
use systemi_gateway::net::{Transport, TransportError};
use systemi_gateway::routing::Endpoint;

pub const API_KEY: &str = "test-key";

/// What the mock backend does with one request.
pub enum Reply {
    Message(String),
    /// Close the socket without answering.
    Close,
    /// Never answer.
    Hang,
}

/// A running loopback System I.
pub struct MockSystemI {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<String>>>,
}

impl MockSystemI {
    pub fn requests(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a mock System I on an ephemeral port.
pub async fn start_system_i<F>(framing: Framing, respond: F) -> MockSystemI
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let log = received.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = respond.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let bytes = match framing {
                    Framing::LengthPrefixed => {
                        let mut prefix = [0u8; 4];
                        if socket.read_exact(&mut prefix).await.is_err() {
                            return;
                        }
                        let mut body = vec![0u8; u32::from_be_bytes(prefix) as usize];
                        if socket.read_exact(&mut body).await.is_err() {
                            return;
                        }
                        body
                    }
                    Framing::Unframed => {
                        let mut buf = vec![0u8; 64 * 1024];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        buf.truncate(n);
                        buf
                    }
                };

                let request = tis620::to_native(&bytes);
                log.lock().unwrap().push(request.clone());

                match respond(&request) {
                    Reply::Message(text) => {
                        let payload = tis620::to_legacy(&text);
                        let out = match framing {
                            Framing::LengthPrefixed => encode_frame(&payload),
                            Framing::Unframed => payload,
                        };
                        let _ = socket.write_all(&out).await;
                        let _ = socket.shutdown().await;
                    }
                    Reply::Close => drop(socket),
                    Reply::Hang => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        drop(socket);
                    }
                }
            });
        }
    });

    MockSystemI { addr, received }
}

/// Answer `request` the way System I does: echo the routing part of the
/// request header, then status code, status message and body.
pub fn reply_to(request: &str, code: &str, message: &str, body: &str) -> String {
    let echoed: String = request.chars().take(62).collect();
    let total = HEADER_LENGTH + body.chars().count();
    let mut out = format!("{:<62}{:05}{:<6}{:<50}", echoed, total, code, message);
    out.push_str(body);
    out
}

/// Body of the request, header stripped.
pub fn body_of(request: &str) -> String {
    request.chars().skip(HEADER_LENGTH).collect()
}

/// A config routing every operation to `port` on loopback.
pub fn config_for(port: u16, framing: Framing, io_timeout_secs: u64) -> GatewayConfig {
    let framing = match framing {
        Framing::LengthPrefixed => "length_prefixed",
        Framing::Unframed => "unframed",
    };
    let toml = format!(
        r#"
        [transport]
        dial_timeout_secs = 2
        io_timeout_secs = {io_timeout_secs}

        [[api_keys]]
        key = "{API_KEY}"
        client_name = "integration"
        permissions = ["*"]

        [destinations.systemi]
        type = "tcp"
        host = "127.0.0.1"
        ports = [{port}]
        framing = "{framing}"

        [routes."POST:/Api/Collection/CollectionDetail"]
        system = "SYSI"
        service = "COLDETAIL"
        format = "FX1"

        [routes."POST:/Api/Collection/CollectionLog"]
        system = "SYSI"
        service = "COLLOG"
        format = "FX1"

        [routes."POST:/Api/SelfService/MyCard"]
        system = "SYSI"
        service = "MYCARD"
        format = "FX1"

        [routes."POST:/Api/SelfService/MyCardAll"]
        system = "SYSI"
        service = "MYCARDALL"
        format = "FX1"

        [routes."POST:/Api/Consent/UpdateConsent"]
        system = "SYSI"
        service = "CONSENT"
        format = "FX1"
        "#
    );
    parse_config(&toml).unwrap()
}

/// Transport double that answers from a script and records what it was sent.
pub struct StubTransport {
    replies: Mutex<Vec<Result<String, TransportError>>>,
    pub sent: Mutex<Vec<(Endpoint, String)>>,
}

impl StubTransport {
    pub fn new(replies: Vec<Result<String, TransportError>>) -> Self {
        Self { replies: Mutex::new(replies), sent: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send_and_receive(&self, endpoint: &Endpoint, request: &str) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push((endpoint.clone(), request.to_string()));
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(TransportError::Internal { address: endpoint.address.clone(), reason: "no scripted reply".into() });
        }
        replies.remove(0)
    }
}
