// tests/common/mod.rs
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use http::StatusCode;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::sources::TokenSource;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn unavailable() -> Error {
    Error::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: None,
        message: Some("identity service unavailable".to_owned()),
    }
}

/// In-process credential source whose outcome the test changes at will.
#[derive(Clone)]
pub struct ScriptedSource {
    calls: Arc<AtomicUsize>,
    outcome: Arc<Mutex<Result<String>>>,
    delay: Arc<Mutex<Duration>>,
}

impl ScriptedSource {
    pub fn new(token: &str) -> Self {
        Self::with_outcome(Ok(token.to_owned()))
    }

    pub fn failing(err: Error) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<String>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            outcome: Arc::new(Mutex::new(outcome)),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn succeed_with(&self, token: &str) {
        *self.outcome.lock().unwrap() = Ok(token.to_owned());
    }

    pub fn fail_with(&self, err: Error) {
        *self.outcome.lock().unwrap() = Err(err);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn obtain_token(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.outcome.lock().unwrap().clone()
    }
}
