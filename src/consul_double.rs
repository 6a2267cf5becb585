//! Stateful stand-in for a Consul agent's KV endpoints
//!
//! Answers `PUT`, `GET` (`?raw` and `?keys`) and `DELETE` under `/v1/kv/`
//! from an in-process map, so registry round trips can be exercised without
//! a running agent. Keys are taken from the request path verbatim; tests
//! should stick to keys that need no percent-encoding.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const KV_PATH: &str = "/v1/kv/";

/// Consul KV double mounted on a wiremock server
#[derive(Clone, Default)]
pub struct ConsulKvDouble {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl ConsulKvDouble {
    /// Start a mock server answering the KV API from a fresh double
    pub async fn start() -> (MockServer, Self) {
        let server = MockServer::start().await;
        let double = Self::default();
        Mock::given(path_regex("^/v1/kv/"))
            .respond_with(double.clone())
            .mount(&server)
            .await;
        (server, double)
    }

    /// Current value of `key`, bypassing HTTP
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn list(&self, prefix: &str) -> ResponseTemplate {
        let entries = self.entries.lock().unwrap();
        let keys: Vec<&String> = entries.keys().filter(|k| k.starts_with(prefix)).collect();
        if keys.is_empty() {
            return ResponseTemplate::new(404);
        }
        ResponseTemplate::new(200).set_body_json(keys)
    }
}

impl Respond for ConsulKvDouble {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let key = request.url.path().trim_start_matches(KV_PATH).to_string();
        let has_flag = |flag: &str| request.url.query_pairs().any(|(name, _)| name == flag);

        match request.method.as_str() {
            "PUT" => {
                let value = String::from_utf8_lossy(&request.body).into_owned();
                self.entries.lock().unwrap().insert(key, value);
                ResponseTemplate::new(200).set_body_string("true")
            }
            "GET" if has_flag("keys") => self.list(&key),
            "GET" => match self.entries.lock().unwrap().get(&key) {
                Some(value) if has_flag("raw") => ResponseTemplate::new(200).set_body_string(value.clone()),
                Some(_) => ResponseTemplate::new(400).set_body_string("only ?raw reads are supported"),
                None => ResponseTemplate::new(404),
            },
            "DELETE" => {
                self.entries.lock().unwrap().remove(&key);
                ResponseTemplate::new(200).set_body_string("true")
            }
            _ => ResponseTemplate::new(405),
        }
    }
}
