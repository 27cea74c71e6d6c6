#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Once};

use anacreon_core::{AnacreonClient, ClientConfig, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

pub const GAME_ID: &str = "8JNJ7FNZ";
pub const AUTH_TOKEN: &str = "test-token";

static TRACING: Once = Once::new();

/// Routes library logs to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("missing fixture {}: {err}", path.display()));
    serde_json::from_str(&text).expect("fixture is valid JSON")
}

pub fn fixture_elements(name: &str) -> Vec<Value> {
    match fixture(name) {
        Value::Array(elements) => elements,
        other => panic!("fixture {name} is not an array: {other}"),
    }
}

/// One request the client sent.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub endpoint: &'static str,
    pub body: Option<Value>,
    pub query: Vec<(&'static str, String)>,
}

impl Recorded {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
struct Script {
    queued: Mutex<HashMap<&'static str, VecDeque<Result<Value, TransportError>>>>,
    repeated: Mutex<HashMap<&'static str, Value>>,
    requests: Mutex<Vec<Recorded>>,
}

/// A transport that answers from a script and records every request.
/// Clones share the script.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the next request to `endpoint` with `body`.
    pub fn respond(&self, endpoint: &'static str, body: Value) -> &Self {
        self.script
            .queued
            .lock()
            .entry(endpoint)
            .or_default()
            .push_back(Ok(body));
        self
    }

    pub fn fail(&self, endpoint: &'static str, error: TransportError) -> &Self {
        self.script
            .queued
            .lock()
            .entry(endpoint)
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Answers every request to `endpoint` with `body` once its queue is empty.
    pub fn always(&self, endpoint: &'static str, body: Value) -> &Self {
        self.script.repeated.lock().insert(endpoint, body);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.requests.lock().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.endpoint == endpoint)
            .collect()
    }

    fn answer(&self, request: Recorded) -> Result<Value, TransportError> {
        let endpoint = request.endpoint;
        self.script.requests.lock().push(request);
        if let Some(next) = self
            .script
            .queued
            .lock()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
        {
            return next;
        }
        self.script
            .repeated
            .lock()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| TransportError::HttpStatus {
                endpoint: endpoint.to_string(),
                code: 404,
                body: "no scripted response".to_string(),
            })
    }
}

impl Transport for ScriptedTransport {
    async fn post(&self, endpoint: &'static str, body: Value) -> Result<Value, TransportError> {
        self.answer(Recorded {
            endpoint,
            body: Some(body),
            query: Vec::new(),
        })
    }

    async fn get(
        &self,
        endpoint: &'static str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Value, TransportError> {
        self.answer(Recorded {
            endpoint,
            body: None,
            query,
        })
    }
}

/// A client bootstrapped from the fixtures, plus the transport behind it.
pub async fn bootstrap() -> anyhow::Result<(AnacreonClient<ScriptedTransport>, ScriptedTransport)> {
    init_tracing();
    let transport = ScriptedTransport::new();
    transport
        .respond("getGameInfo", fixture("game_info.json"))
        .respond("getObjects", fixture("get_objects.json"));
    let client = AnacreonClient::from_auth_token(
        transport.clone(),
        ClientConfig::builtin(),
        GAME_ID,
        AUTH_TOKEN,
    )
    .await?;
    Ok((client, transport))
}
