use std::io::ErrorKind;
use std::time::Duration;

use adnauseam_core::StoreConfig;

use crate::error::StoreError;
use crate::protocol::StoreResponse;
use crate::Store;

/// Blocking etcd v2 client for one key-space base URL.
pub struct EtcdClient {
    agent: ureq::Agent,
    base_url: String,
    request_timeout: Duration,
    watch_timeout: Duration,
}

impl EtcdClient {
    pub fn new(config: &StoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.request_timeout())
            .build();
        Self {
            agent,
            base_url: config.base_url(),
            request_timeout: config.request_timeout(),
            watch_timeout: config.watch_timeout(),
        }
    }

    fn get(
        &self,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<StoreResponse, StoreError> {
        let url = &self.base_url;
        let mut request = self.agent.get(url).timeout(timeout);
        for (name, value) in query {
            request = request.query(name, value);
        }
        tracing::trace!(url = %url, ?query, "store request");

        match request.call() {
            Ok(response) => decode(url, response),
            // etcd answers 4xx with an error document (key not found, index cleared).
            Err(ureq::Error::Status(status, response)) => match decode(url, response) {
                Ok(parsed) => Ok(parsed),
                Err(StoreError::Decode { .. }) => Err(StoreError::UnexpectedStatus {
                    url: url.clone(),
                    status,
                }),
                Err(err) => Err(err),
            },
            Err(ureq::Error::Transport(transport)) => {
                if transport_timed_out(&transport) {
                    Err(StoreError::Timeout { url: url.clone() })
                } else {
                    Err(StoreError::Transport {
                        url: url.clone(),
                        message: transport.to_string(),
                    })
                }
            }
        }
    }
}

impl Store for EtcdClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list(&self) -> Result<StoreResponse, StoreError> {
        self.get(&[("recursive", "true".to_string())], self.request_timeout)
    }

    fn watch(&self, wait_index: u64) -> Result<StoreResponse, StoreError> {
        self.get(
            &[
                ("wait", "true".to_string()),
                ("recursive", "true".to_string()),
                ("waitIndex", wait_index.to_string()),
            ],
            self.watch_timeout,
        )
    }
}

fn decode(url: &str, response: ureq::Response) -> Result<StoreResponse, StoreError> {
    response.into_json::<StoreResponse>().map_err(|source| {
        if is_timeout_kind(source.kind()) {
            StoreError::Timeout {
                url: url.to_string(),
            }
        } else {
            StoreError::Decode {
                url: url.to_string(),
                source,
            }
        }
    })
}

fn transport_timed_out(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if is_timeout_kind(io.kind()) {
                return true;
            }
        }
        source = err.source();
    }
    false
}

fn is_timeout_kind(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::TimedOut | ErrorKind::WouldBlock)
}
