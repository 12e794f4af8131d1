// crates/trench-server/src/sim/client.rs
// Bearer-authenticated JSON client for the simulator's HTTP API

use super::SimulatorApi;
use crate::config::ApiConfig;
use crate::error::{Result, TrenchError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Max characters of an error body kept in `TrenchError::Api`
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Simulator API client.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection
/// pool, so one client can serve every concurrent wait loop.
#[derive(Clone)]
pub struct SimulatorClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for SimulatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatorClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl SimulatorClient {
    pub fn new(http: Client, api: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(api.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(TrenchError::Config(format!(
                "TRENCH_API_URL '{}' cannot be used as a base URL",
                api.base_url
            )));
        }
        Ok(Self {
            http,
            base_url,
            token: api.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join an absolute API path onto the base URL, keeping any base path prefix.
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TrenchError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        if !status.is_success() {
            let body = if text.chars().count() > MAX_ERROR_BODY_CHARS {
                let head: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
                format!("{}...", head)
            } else {
                text
            };
            return Err(TrenchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SimulatorApi for SimulatorClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path, query)?;
        debug!(%url, "GET");
        self.send(self.http.get(url)).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value> {
        let url = self.url(path, &[])?;
        debug!(%url, "POST");
        self.send(self.http.post(url).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::endpoints;
    use axum::{
        Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use serde_json::json;
    use std::collections::HashMap;
    use trench_types::ContactTarget;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, token: Option<&str>) -> SimulatorClient {
        SimulatorClient::new(
            Client::new(),
            &ApiConfig {
                base_url: base_url.to_string(),
                token: token.map(String::from),
            },
        )
        .unwrap()
    }

    fn target() -> ContactTarget {
        ContactTarget {
            satellite_id: "SAT 1".into(),
            ground_station_id: "GS-1".into(),
        }
    }

    #[test]
    fn test_url_keeps_base_prefix_and_encodes_query() {
        let c = client("http://sim.local:8000/proxy/", None);
        let url = c
            .url("/api/v1/passes", &[("satellite_id", "SAT 1&x".into())])
            .unwrap();
        assert_eq!(url.path(), "/proxy/api/v1/passes");
        assert_eq!(url.query(), Some("satellite_id=SAT+1%26x"));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = SimulatorClient::new(
            Client::new(),
            &ApiConfig {
                base_url: "not a url".into(),
                token: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, TrenchError::Config(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let c = client("http://localhost:8000", Some("top-secret"));
        let debug = format!("{:?}", c);
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("has_token: true"));
    }

    #[tokio::test]
    async fn test_state_sends_bearer_token() {
        let router = Router::new().route(
            endpoints::SIMULATION_STATE,
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer tok" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                (StatusCode::OK, Json(json!({ "sim_time": 1234.5, "running": true })))
            }),
        );
        let base = spawn(router).await;

        let state = client(&base, Some("tok")).simulation_state().await.unwrap();
        assert_eq!(state.sim_time, 1234.5);

        let err = client(&base, None).simulation_state().await.unwrap_err();
        assert!(matches!(err, TrenchError::Unauthorized { status: 401 }));
    }

    #[tokio::test]
    async fn test_next_pass_variants() {
        let router = Router::new().route(
            endpoints::NEXT_PASS,
            get(|Query(q): Query<HashMap<String, String>>| async move {
                match q.get("ground_station_id").map(String::as_str) {
                    Some("GS-1") => (
                        StatusCode::OK,
                        Json(json!({ "pass": {
                            "pass_id": "p-9",
                            "satellite_id": q.get("satellite_id").cloned().unwrap_or_default(),
                            "ground_station_id": "GS-1",
                            "aos": 500.0,
                            "los": 900.0
                        }})),
                    ),
                    Some("GS-EMPTY") => (StatusCode::OK, Json(json!({ "pass": null }))),
                    _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "no pass" }))),
                }
            }),
        );
        let base = spawn(router).await;
        let c = client(&base, Some("tok"));

        let pass = c.next_pass(&target()).await.unwrap().unwrap();
        assert_eq!(pass.pass_id, "p-9");
        assert_eq!(pass.satellite_id, "SAT 1");
        assert_eq!(pass.aos, 500.0);

        let mut empty = target();
        empty.ground_station_id = "GS-EMPTY".into();
        assert!(c.next_pass(&empty).await.unwrap().is_none());

        let mut missing = target();
        missing.ground_station_id = "GS-NONE".into();
        assert!(c.next_pass(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_post_and_error_mapping() {
        let router = Router::new()
            .route(
                endpoints::DOWNLINK_SESSIONS,
                post(|Json(body): Json<Value>| async move {
                    (StatusCode::CREATED, Json(json!({ "session_id": "d-1", "echo": body })))
                }),
            )
            .route(
                endpoints::HEALTH,
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "simulator down".to_string()) }),
            );
        let base = spawn(router).await;
        let c = client(&base, Some("tok"));

        let created = c
            .post_json(endpoints::DOWNLINK_SESSIONS, json!({ "pass_id": "p-1" }))
            .await
            .unwrap();
        assert_eq!(created["session_id"], "d-1");
        assert_eq!(created["echo"]["pass_id"], "p-1");

        let err = c.get_json(endpoints::HEALTH, &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("simulator down"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let c = client("http://127.0.0.1:1", None);
        let err = c.simulation_state().await.unwrap_err();
        assert!(matches!(err, TrenchError::Http(_)));
    }
}
