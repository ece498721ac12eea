#![allow(clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub, dead_code)]
use std::sync::{Arc, Once};
use user_api::config::HealthConfig;
use user_api::storage::{InMemoryUserStore, UserStore};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("user_api=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_health_config() -> HealthConfig {
    HealthConfig { db_timeout_ms: 500 }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns both routers on ephemeral ports, backed by a fresh in-memory store.
    pub async fn spawn() -> (Self, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        let app = Self::spawn_with_store(Arc::clone(&store) as Arc<dyn UserStore>).await;
        (app, store)
    }

    pub async fn spawn_with_store(store: Arc<dyn UserStore>) -> Self {
        setup_tracing();
        let user_api::Routers { api, mgmt } = user_api::build_routers(store, get_test_health_config());

        let api_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(api_listener, api).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new() }
    }

    pub async fn save(&self, body: &serde_json::Value) -> (reqwest::StatusCode, String) {
        let resp = self.client.post(format!("{}/api/save", self.server_url)).json(body).send().await.unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }

    pub async fn find(&self, id: &str) -> (reqwest::StatusCode, String) {
        let resp = self.client.get(format!("{}/api/{}", self.server_url, id)).send().await.unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }
}

pub fn user_payload(email: &str, id: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "test user",
        "email": email,
        "id": id,
        "date_of_birth": "1990-01-01T00:00:00Z",
    })
}
