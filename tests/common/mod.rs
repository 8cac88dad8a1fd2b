#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use base64::{Engine as _, engine::general_purpose};
use serde_json::{Value, json};

use dreamroom::{
    AppContext, Config,
    generators::{HttpGenerator, RequestBody},
    store::MemoryStore,
    ui::RecordingSurface,
};

pub const IMAGE_URL: &str = "https://x/img.png";

/// A minimal PNG header; enough for type sniffing.
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// One request as seen by the mock generation endpoint.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub image_len: usize,
    pub image_type: Option<String>,
}

pub type Hits = Arc<Mutex<Vec<Captured>>>;

async fn capture_multipart(mut multipart: Multipart) -> Captured {
    let mut captured = Captured::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            "image" => {
                captured.image_len = data.len();
                captured.image_type = content_type;
            }
            "prompt" => captured.prompt = Some(String::from_utf8_lossy(&data).into_owned()),
            "style" => captured.style = Some(String::from_utf8_lossy(&data).into_owned()),
            _ => {}
        }
    }
    captured
}

async fn generate_ok(State(hits): State<Hits>, multipart: Multipart) -> Json<Value> {
    let captured = capture_multipart(multipart).await;
    hits.lock().unwrap().push(captured);
    Json(json!({ "imageUrl": IMAGE_URL }))
}

async fn generate_json(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.lock().unwrap().push(Captured {
        prompt: body["prompt"].as_str().map(str::to_string),
        ..Default::default()
    });
    Json(json!({ "imageUrl": IMAGE_URL }))
}

async fn generate_fail(State(hits): State<Hits>, multipart: Multipart) -> (StatusCode, Json<Value>) {
    let captured = capture_multipart(multipart).await;
    hits.lock().unwrap().push(captured);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

async fn generate_empty(State(hits): State<Hits>, multipart: Multipart) -> Json<Value> {
    let captured = capture_multipart(multipart).await;
    hits.lock().unwrap().push(captured);
    Json(json!({ "message": "queued" }))
}

/// A local stand-in for the generation backend.
pub struct MockServer {
    pub base_url: String,
    pub hits: Hits,
}

impl MockServer {
    pub async fn start() -> Self {
        let hits: Hits = Arc::default();
        let app = Router::new()
            .route("/api/generate", post(generate_ok))
            .route("/api/generate-json", post(generate_json))
            .route("/api/generate-fail", post(generate_fail))
            .route("/api/generate-empty", post(generate_empty))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> Vec<Captured> {
        self.hits.lock().unwrap().clone()
    }
}

/// Builds an identity token whose payload is `payload`.
pub fn identity_token(payload: Value) -> String {
    format!(
        "eyJhbGciOiJSUzI1NiJ9.{}.c2lnbmF0dXJl",
        general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn ada_token() -> String {
    identity_token(json!({
        "sub": "110169484474386276334",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "picture": "https://lh3.example.com/ada.png"
    }))
}

pub type TestContext = AppContext<MemoryStore, HttpGenerator>;

/// A context wired to `endpoint` with an in-memory store.
pub fn context(
    endpoint: &str,
    body: RequestBody,
    store: MemoryStore,
) -> (TestContext, RecordingSurface) {
    let config = Config {
        generate_endpoint: endpoint.to_string(),
        ..Config::default()
    };
    let generator =
        HttpGenerator::new(&config.generate_endpoint, body, config.request_timeout).unwrap();
    let ui = RecordingSurface::new();
    let context = AppContext::with_parts(config, store, generator, Arc::new(ui.clone()));
    (context, ui)
}
