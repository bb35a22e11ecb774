#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use adnauseam_daemon::RetryPolicy;
use adnauseam_renderer::TemplateSpec;
use adnauseam_store::{ApiError, ChangeEvent, Node, Store, StoreError, StoreResponse};
use adnauseam_sync::RenderPipeline;
use tokio::sync::broadcast;

pub const SCRIPTED_URL: &str = "scripted://store/v2/keys/";

type Reply = Result<StoreResponse, StoreError>;

/// Store that replays canned replies and records every requested wait index.
///
/// Once the watch script runs out it either publishes a shutdown and times
/// out, or keeps failing with a transport error.
pub struct ScriptedStore {
    listings: Mutex<VecDeque<Reply>>,
    watches: Mutex<VecDeque<Reply>>,
    requested: Mutex<Vec<u64>>,
    on_exhausted: Option<broadcast::Sender<()>>,
}

impl ScriptedStore {
    pub fn new(listings: Vec<Reply>, watches: Vec<Reply>) -> Self {
        Self {
            listings: Mutex::new(listings.into()),
            watches: Mutex::new(watches.into()),
            requested: Mutex::new(Vec::new()),
            on_exhausted: None,
        }
    }

    pub fn shutting_down(mut self, shutdown: broadcast::Sender<()>) -> Self {
        self.on_exhausted = Some(shutdown);
        self
    }

    pub fn requested(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

impl Store for ScriptedStore {
    fn base_url(&self) -> &str {
        SCRIPTED_URL
    }

    fn list(&self) -> Result<StoreResponse, StoreError> {
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(transport("listing script exhausted")))
    }

    fn watch(&self, wait_index: u64) -> Result<StoreResponse, StoreError> {
        self.requested.lock().unwrap().push(wait_index);
        if let Some(reply) = self.watches.lock().unwrap().pop_front() {
            return reply;
        }
        match &self.on_exhausted {
            Some(shutdown) => {
                let _ = shutdown.send(());
                Err(timeout())
            }
            None => Err(transport("watch script exhausted")),
        }
    }
}

pub fn transport(message: &str) -> StoreError {
    StoreError::Transport {
        url: SCRIPTED_URL.to_string(),
        message: message.to_string(),
    }
}

pub fn timeout() -> StoreError {
    StoreError::Timeout {
        url: SCRIPTED_URL.to_string(),
    }
}

fn leaf(key: &str, value: Option<&str>, revision: u64) -> Node {
    Node {
        key: Some(key.to_string()),
        value: value.map(str::to_string),
        modified_index: revision,
        ..Node::default()
    }
}

pub fn change(action: &str, key: &str, value: Option<&str>, revision: u64) -> Reply {
    Ok(StoreResponse::Change(ChangeEvent {
        action: action.to_string(),
        node: leaf(key, value, revision),
    }))
}

pub fn listing(leaves: &[(&str, &str, u64)]) -> Reply {
    let nodes = leaves
        .iter()
        .map(|(key, value, revision)| leaf(key, Some(value), *revision))
        .collect();
    Ok(StoreResponse::Change(ChangeEvent {
        action: "get".to_string(),
        node: Node {
            key: Some("/".to_string()),
            dir: true,
            nodes,
            ..Node::default()
        },
    }))
}

pub fn api_error(code: u64, index: u64) -> Reply {
    Ok(StoreResponse::Error(ApiError {
        error_code: code,
        message: "scripted failure".to_string(),
        cause: None,
        index,
    }))
}

/// 100ms doubling to 1s, no jitter.
pub fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        initial: Duration::from_millis(100),
        max: Duration::from_secs(1),
        max_attempts,
        jitter: Duration::ZERO,
    }
}

/// Pipeline whose bindings render from inline template text.
pub fn pipeline(templates: &[&str]) -> RenderPipeline {
    let mut pipeline = RenderPipeline::new();
    for (i, text) in templates.iter().enumerate() {
        let path = format!("inline-{i}.template");
        let spec = TemplateSpec::parse(Path::new(&path), text).expect("template parses");
        pipeline.add(Path::new(&path), &spec, Path::new(&format!("/nonexistent/out-{i}")));
    }
    pipeline
}
