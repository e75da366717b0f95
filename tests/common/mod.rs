//! Shared utilities for integration tests.

#![allow(dead_code)]

use fake_errol::{FakeErrol, ServerConfig};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

/// Start a server on an ephemeral port.
pub async fn start_server(cluster_key: &str) -> FakeErrol {
    FakeErrol::start(ServerConfig::new(0, cluster_key))
        .await
        .expect("server should bind")
}

/// Minimal client for the device API, scoped to one instance.
pub struct DeviceClient {
    client: Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(server: &FakeErrol, instance_id: &str) -> Self {
        Self {
            client: Client::builder().no_proxy().build().unwrap(),
            base_url: format!("{}/instances/{}/devices/fcm", server.base_url(), instance_id),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    pub async fn register(&self, token: &str) -> String {
        let res = self
            .client
            .post(self.url(""))
            .json(&json!({ "token": token }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["initialInterestSet"], json!([]));
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, device_id: &str) -> Response {
        self.client.get(self.url(&format!("/{device_id}"))).send().await.unwrap()
    }

    pub async fn delete(&self, device_id: &str) -> StatusCode {
        self.client
            .delete(self.url(&format!("/{device_id}")))
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn update_token(&self, device_id: &str, token: &str) -> StatusCode {
        self.client
            .put(self.url(&format!("/{device_id}/token")))
            .json(&json!({ "token": token }))
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn associate_user(&self, device_id: &str, authorization: Option<&str>) -> StatusCode {
        let mut req = self.client.put(self.url(&format!("/{device_id}/user")));
        if let Some(value) = authorization {
            req = req.header("Authorization", value);
        }
        req.send().await.unwrap().status()
    }

    pub async fn user_id(&self, device_id: &str) -> Option<String> {
        let body: Value = self.get(device_id).await.json().await.unwrap();
        body.get("userId").and_then(Value::as_str).map(str::to_string)
    }

    pub async fn interests(&self, device_id: &str) -> Result<Vec<String>, StatusCode> {
        let res = self
            .client
            .get(self.url(&format!("/{device_id}/interests")))
            .send()
            .await
            .unwrap();
        if res.status() != StatusCode::OK {
            return Err(res.status());
        }
        let body: Value = res.json().await.unwrap();
        Ok(serde_json::from_value(body["interests"].clone()).unwrap())
    }

    pub async fn add_interest(&self, device_id: &str, interest: &str) -> StatusCode {
        self.client
            .post(self.url(&format!("/{device_id}/interests/{interest}")))
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn remove_interest(&self, device_id: &str, interest: &str) -> StatusCode {
        self.client
            .delete(self.url(&format!("/{device_id}/interests/{interest}")))
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn replace_interests(&self, device_id: &str, interests: &[&str]) -> StatusCode {
        self.client
            .put(self.url(&format!("/{device_id}/interests")))
            .json(&json!({ "interests": interests }))
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn update_metadata(&self, device_id: &str, body: Value) -> StatusCode {
        self.client
            .put(self.url(&format!("/{device_id}/metadata")))
            .json(&body)
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn raw(&self, method: reqwest::Method, suffix: &str, body: &'static str) -> Response {
        self.client
            .request(method, self.url(suffix))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }
}
