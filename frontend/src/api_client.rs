//! Client for the vault server API
//!
//! Every call resolves to a typed [`Fault`] on failure: HTTP status codes pick
//! the fault kind, the server's `message` becomes the fault message.

use serde::de::DeserializeOwned;
use serde::Serialize;
use vault_core::api::{
    Credentials, DeletePasswordRequest, LoginResponse, MessageResponse, Profile,
    ProfileUpdateResponse, SavePasswordRequest, ServiceCredential, UpdatePasswordRequest,
};
use vault_core::Fault;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

/// Client for the vault server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

enum Body {
    Empty,
    Json(String),
    Form(FormData),
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Check if the server is reachable
    pub async fn health_check(&self) -> Result<bool, Fault> {
        let resp = self.send("GET", "/health", Body::Empty).await?;
        Ok(resp.ok())
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<MessageResponse, Fault> {
        let body = json_body(&Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        self.request("POST", "/api/register", body).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, Fault> {
        let body = json_body(&Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        self.request("POST", "/api/login", body).await
    }

    pub async fn list_passwords(&self, username: &str) -> Result<Vec<ServiceCredential>, Fault> {
        let path = format!("/api/passwords?username={}", encode(username));
        self.request("GET", &path, Body::Empty).await
    }

    pub async fn save_password(
        &self,
        username: &str,
        service: &str,
        password: &str,
    ) -> Result<MessageResponse, Fault> {
        let body = json_body(&SavePasswordRequest {
            username: Some(username.to_string()),
            service: service.to_string(),
            password: password.to_string(),
        })?;
        self.request("POST", "/api/passwords", body).await
    }

    pub async fn update_password(
        &self,
        username: &str,
        service: &str,
        new_password: &str,
    ) -> Result<MessageResponse, Fault> {
        let body = json_body(&UpdatePasswordRequest {
            username: Some(username.to_string()),
            service: Some(service.to_string()),
            new_password: Some(new_password.to_string()),
        })?;
        self.request("PUT", "/api/passwords", body).await
    }

    pub async fn delete_password(
        &self,
        username: &str,
        service: &str,
    ) -> Result<MessageResponse, Fault> {
        let body = json_body(&DeletePasswordRequest {
            username: Some(username.to_string()),
            service: service.to_string(),
        })?;
        self.request("POST", "/api/passwords/delete", body).await
    }

    /// Fetch a profile; a user without one yields `None`
    pub async fn profile(&self, username: &str) -> Result<Option<Profile>, Fault> {
        let path = format!("/api/profile?username={}", encode(username));
        let resp = self.send("GET", &path, Body::Empty).await?;
        if resp.status() == 404 {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }

    pub async fn update_profile(
        &self,
        username: &str,
        email: &str,
        avatar: Option<web_sys::File>,
    ) -> Result<ProfileUpdateResponse, Fault> {
        let form = FormData::new().map_err(js_fault)?;
        form.append_with_str("username", username).map_err(js_fault)?;
        form.append_with_str("email", email).map_err(js_fault)?;
        if let Some(file) = avatar {
            form.append_with_blob_and_filename("avatar", &file, &file.name())
                .map_err(js_fault)?;
        }
        self.request("POST", "/api/profile", Body::Form(form)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Body,
    ) -> Result<T, Fault> {
        let resp = self.send(method, path, body).await?;
        read_json(resp).await
    }

    async fn send(&self, method: &str, path: &str, body: Body) -> Result<Response, Fault> {
        let url = format!("{}{}", self.base_url, path);
        let window = web_sys::window().ok_or_else(|| Fault::other("No window object"))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let content_type = match &body {
            Body::Empty => None,
            Body::Json(json) => {
                opts.set_body(&JsValue::from_str(json));
                Some("application/json")
            }
            // The browser sets the multipart boundary itself
            Body::Form(form) => {
                opts.set_body(form);
                None
            }
        };

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_fault)?;
        if let Some(content_type) = content_type {
            request
                .headers()
                .set("Content-Type", content_type)
                .map_err(js_fault)?;
        }

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| Fault::other(format!("Network error: {}", describe(&e))))?;

        resp_value
            .dyn_into()
            .map_err(|_| Fault::other("Response is not a Response object"))
    }
}

/// Decode a response body, turning non-2xx statuses into faults
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, Fault> {
    let promise = resp.json().map_err(js_fault)?;
    let json = JsFuture::from(promise).await;

    if resp.ok() {
        let json = json.map_err(js_fault)?;
        serde_wasm_bindgen::from_value(json)
            .map_err(|e| Fault::other(format!("Unexpected response: {}", e)))
    } else {
        let message = json
            .ok()
            .and_then(|v| serde_wasm_bindgen::from_value::<MessageResponse>(v).ok())
            .map(|m| m.message)
            .or_else(|| Some(resp.status_text()));
        log::warn!("{} {} -> {}", resp.status(), resp.url(), message.as_deref().unwrap_or(""));
        Err(Fault::from_status(resp.status(), message))
    }
}

fn json_body<T: Serialize>(value: &T) -> Result<Body, Fault> {
    serde_json::to_string(value)
        .map(Body::Json)
        .map_err(|e| Fault::other(format!("Failed to serialize request: {}", e)))
}

fn js_fault(e: JsValue) -> Fault {
    Fault::other(describe(&e))
}

fn describe(e: &JsValue) -> String {
    e.dyn_ref::<js_sys::Error>()
        .and_then(|err| err.message().as_string())
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{:?}", e))
}

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}
