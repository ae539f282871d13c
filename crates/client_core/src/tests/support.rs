use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{error::TransportError, transport::Transport};

#[derive(Clone)]
struct Script {
    delay: Duration,
    outcome: Result<Value, TransportError>,
}

/// In-memory transport answering from per-URL scripts. Unscripted URLs
/// answer HTTP 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    requested: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, body: Value) -> &Self {
        self.respond_after(url, Duration::ZERO, body)
    }

    pub(crate) fn respond_after(&self, url: &str, delay: Duration, body: Value) -> &Self {
        self.script(url, delay, Ok(body))
    }

    pub(crate) fn fail(&self, url: &str, error: TransportError) -> &Self {
        self.script(url, Duration::ZERO, Err(error))
    }

    pub(crate) fn fail_with_status(&self, url: &str, status: u16) -> &Self {
        self.fail(
            url,
            TransportError::Status {
                url: url.to_string(),
                status,
            },
        )
    }

    fn script(
        &self,
        url: &str,
        delay: Duration,
        outcome: Result<Value, TransportError>,
    ) -> &Self {
        self.scripts
            .lock()
            .expect("scripts lock")
            .insert(url.to_string(), Script { delay, outcome });
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("requested lock").clone()
    }

    pub(crate) fn completed(&self) -> Vec<String> {
        self.completed.lock().expect("completed lock").clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_log(&self) {
        self.requested.lock().expect("requested lock").clear();
        self.completed.lock().expect("completed lock").clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(url.to_string());
        let script = self.scripts.lock().expect("scripts lock").get(url).cloned();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(script) = &script {
            if !script.delay.is_zero() {
                tokio::time::sleep(script.delay).await;
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.completed
            .lock()
            .expect("completed lock")
            .push(url.to_string());
        match script {
            Some(script) => script.outcome,
            None => Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub(crate) fn route_body(id: i64, name: &str, description: &str) -> Value {
    json!({
        "route": {
            "route_id": id,
            "name": name,
            "description": description,
            "distance_km": 4.2
        }
    })
}

pub(crate) fn collection_body(id: i64, name: &str, description: &str) -> Value {
    json!({
        "collection": {
            "collection_id": id,
            "name": name,
            "description": description,
            "routes": [1, 2]
        }
    })
}
