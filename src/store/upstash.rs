//! Upstash Redis over its REST interface
//!
//! Every command is a `POST` of the command and its arguments as a JSON
//! array, authenticated with a bearer token. Replies are
//! `{"result": ...}` or `{"error": "..."}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{Result, SignupStore, StoreError};

/// Client for one Upstash database
#[derive(Clone)]
pub struct UpstashStore {
    http: Client,
    url: String,
    token: String,
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl UpstashStore {
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("landing-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Run one command and return its `result`
    async fn command(&self, args: &[&str]) -> Result<Value> {
        tracing::debug!("upstash {}", args.first().copied().unwrap_or_default());

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Reply>(&body) {
            Ok(Reply {
                error: Some(message),
                ..
            }) => Err(StoreError::Command(message)),
            Ok(reply) if status.is_success() => Ok(reply.result),
            _ if !status.is_success() => Err(StoreError::Status { status, body }),
            _ => Err(StoreError::UnexpectedReply(body)),
        }
    }
}

#[async_trait]
impl SignupStore for UpstashStore {
    async fn list_all(&self, key: &str) -> Result<Vec<String>> {
        match self.command(&["LRANGE", key, "0", "-1"]).await? {
            Value::Array(items) => Ok(items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(StoreError::UnexpectedReply(other.to_string())),
        }
    }

    async fn append(&self, key: &str, value: &str) -> Result<u64> {
        let reply = self.command(&["RPUSH", key, value]).await?;
        reply
            .as_u64()
            .ok_or_else(|| StoreError::UnexpectedReply(reply.to_string()))
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let reply = self.command(&["INCR", key]).await?;
        reply
            .as_i64()
            .ok_or_else(|| StoreError::UnexpectedReply(reply.to_string()))
    }

    async fn counter(&self, key: &str) -> Result<Option<i64>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| StoreError::UnexpectedReply(s)),
            Value::Number(n) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| StoreError::UnexpectedReply(n.to_string())),
            other => Err(StoreError::UnexpectedReply(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "test-token";

    /// Just enough of the Upstash REST API to exercise the client
    #[derive(Default)]
    struct FakeUpstash {
        commands: Mutex<Vec<Vec<String>>>,
        lists: Mutex<HashMap<String, Vec<String>>>,
        strings: Mutex<HashMap<String, String>>,
    }

    async fn handle(
        State(fake): State<Arc<FakeUpstash>>,
        headers: HeaderMap,
        Json(cmd): Json<Vec<String>>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if auth != format!("Bearer {}", TOKEN) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            );
        }

        fake.commands.lock().unwrap().push(cmd.clone());

        let reply = match cmd.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            ["LRANGE", key, "0", "-1"] => {
                json!(fake.lists.lock().unwrap().get(*key).cloned().unwrap_or_default())
            }
            ["RPUSH", key, value] => {
                let mut lists = fake.lists.lock().unwrap();
                let list = lists.entry(key.to_string()).or_default();
                list.push(value.to_string());
                json!(list.len())
            }
            ["INCR", key] => {
                let mut strings = fake.strings.lock().unwrap();
                let entry = strings.entry(key.to_string()).or_insert_with(|| "0".into());
                let Ok(n) = entry.parse::<i64>() else {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "ERR value is not an integer or out of range" })),
                    );
                };
                *entry = (n + 1).to_string();
                json!(n + 1)
            }
            ["GET", key] => json!(fake.strings.lock().unwrap().get(*key)),
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "ERR unknown command" })),
                )
            }
        };

        (StatusCode::OK, Json(json!({ "result": reply })))
    }

    async fn spawn_fake() -> (String, Arc<FakeUpstash>) {
        let fake = Arc::new(FakeUpstash::default());
        let app = Router::new()
            .route("/", post(handle))
            .with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/", addr), fake)
    }

    #[tokio::test]
    async fn test_list_commands() {
        let (url, fake) = spawn_fake().await;
        let store = UpstashStore::new(&url, TOKEN).unwrap();

        assert!(store.list_all("email_signups:demo").await.unwrap().is_empty());
        assert_eq!(store.append("email_signups:demo", r#"{"email":"a@b.com"}"#).await.unwrap(), 1);
        assert_eq!(
            store.list_all("email_signups:demo").await.unwrap(),
            vec![r#"{"email":"a@b.com"}"#]
        );

        let commands = fake.commands.lock().unwrap().clone();
        assert_eq!(commands[0], vec!["LRANGE", "email_signups:demo", "0", "-1"]);
        assert_eq!(commands[1][0], "RPUSH");
    }

    #[tokio::test]
    async fn test_counter_commands() {
        let (url, _fake) = spawn_fake().await;
        let store = UpstashStore::new(&url, TOKEN).unwrap();

        assert_eq!(store.counter("count").await.unwrap(), None);
        assert_eq!(store.increment("count").await.unwrap(), 1);
        assert_eq!(store.increment("count").await.unwrap(), 2);
        assert_eq!(store.counter("count").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_non_numeric_counter_is_error() {
        let (url, fake) = spawn_fake().await;
        fake.strings
            .lock()
            .unwrap()
            .insert("count".to_string(), "many".to_string());
        let store = UpstashStore::new(&url, TOKEN).unwrap();

        assert!(matches!(
            store.counter("count").await,
            Err(StoreError::UnexpectedReply(_))
        ));
        assert!(matches!(
            store.increment("count").await,
            Err(StoreError::Command(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_token_is_error() {
        let (url, _fake) = spawn_fake().await;
        let store = UpstashStore::new(&url, "wrong").unwrap();

        let err = store.list_all("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Command(ref m) if m == "Unauthorized"));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = UpstashStore::new(&format!("http://{}", addr), TOKEN).unwrap();
        assert!(matches!(
            store.counter("count").await,
            Err(StoreError::Http(_))
        ));
    }
}
