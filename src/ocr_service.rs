//! The remote OCR service.
//!
//! The service does all the real work. We send it a file and get back a JSON
//! document describing what it found.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Args;
use reqwest::multipart::{Form, Part};
use tokio::time;

use crate::{prelude::*, selected_file::SelectedFile};

/// The upload endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/upload";

/// The multipart field name the service expects the file under.
pub const FILE_FIELD_NAME: &str = "file";

/// Options for talking to the OCR service.
#[derive(Args, Clone, Debug)]
pub struct ServiceOpts {
    /// The URL to upload files to.
    #[clap(long, env = "MARKS_OCR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// A timeout, in seconds, for the service to respond. By default we wait
    /// as long as it takes.
    #[clap(long)]
    pub timeout: Option<u64>,
}

impl Default for ServiceOpts {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
        }
    }
}

/// Interface to an OCR service.
#[async_trait]
pub trait OcrService: Send + Sync + 'static {
    /// Upload a file and return the parsed response body.
    async fn upload(&self, file: &SelectedFile) -> Result<Value>;
}

/// An [`OcrService`] reached over HTTP using a multipart `POST`.
#[derive(Debug, Clone)]
pub struct HttpOcrService {
    client: reqwest::Client,
    opts: ServiceOpts,
}

impl HttpOcrService {
    /// Create a new HTTP client for the service.
    pub fn new(opts: ServiceOpts) -> Self {
        Self {
            client: reqwest::Client::new(),
            opts,
        }
    }

    /// The endpoint we upload to.
    pub fn endpoint(&self) -> &str {
        &self.opts.endpoint
    }

    /// Build our multipart body.
    fn build_form(file: &SelectedFile) -> Result<Form> {
        let part = Part::bytes(file.data().to_vec())
            .file_name(file.file_name().to_owned())
            .mime_str(&file.mime_type())
            .context("Failed to set MIME type for upload")?;
        Ok(Form::new().part(FILE_FIELD_NAME, part))
    }

    /// Send the request and read the body, without any timeout.
    async fn send(&self, file: &SelectedFile) -> Result<Value> {
        let form = Self::build_form(file)?;
        let response = self
            .client
            .post(&self.opts.endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to upload {} to {}",
                    file.file_name(),
                    self.opts.endpoint
                )
            })?;

        // Non-success statuses aren't treated as errors. Whatever the server
        // sent back gets parsed and shown.
        let status = response.status();
        if status.is_success() {
            debug!(%status, "OCR service responded");
        } else {
            warn!(%status, "OCR service returned a non-success status");
        }

        let body = response
            .bytes()
            .await
            .context("failed to read OCR response")?;
        serde_json::from_slice(&body).with_context(|| {
            format!(
                "failed to parse OCR response (status {}): {:?}",
                status,
                String::from_utf8_lossy(&body)
            )
        })
    }
}

#[async_trait]
impl OcrService for HttpOcrService {
    #[instrument(level = "debug", skip_all, fields(file = %file.file_name(), endpoint = %self.opts.endpoint))]
    async fn upload(&self, file: &SelectedFile) -> Result<Value> {
        match self.opts.timeout {
            Some(secs) => time::timeout(Duration::from_secs(secs), self.send(file))
                .await
                .map_err(|_| anyhow!("OCR service did not respond within {secs}s"))?,
            None => self.send(file).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! An in-process stand-in for the OCR service.

    use std::{net::SocketAddr, sync::Arc};

    use axum::{
        Router,
        extract::{Multipart, State},
        http::{StatusCode, header},
        response::IntoResponse,
        routing::post,
    };
    use tokio::{net::TcpListener, sync::Mutex};

    /// One request received by [`FakeServer`].
    #[derive(Debug, Clone)]
    pub struct ReceivedPart {
        pub name: String,
        pub file_name: Option<String>,
        pub content_type: Option<String>,
        pub data: Vec<u8>,
    }

    #[derive(Clone)]
    struct ServerState {
        status: StatusCode,
        body: String,
        requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
    }

    /// A tiny HTTP server with an `/upload` route which records what it
    /// receives and replies with a canned body.
    pub struct FakeServer {
        pub addr: SocketAddr,
        requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
    }

    impl FakeServer {
        pub async fn start(status: StatusCode, body: &str) -> Self {
            let requests = Arc::new(Mutex::new(vec![]));
            let state = ServerState {
                status,
                body: body.to_owned(),
                requests: requests.clone(),
            };
            let app = Router::new()
                .route("/upload", post(upload))
                .with_state(state);
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            Self { addr, requests }
        }

        pub fn endpoint(&self) -> String {
            format!("http://{}/upload", self.addr)
        }

        pub async fn requests(&self) -> Vec<Vec<ReceivedPart>> {
            self.requests.lock().await.clone()
        }
    }

    async fn upload(
        State(state): State<ServerState>,
        mut multipart: Multipart,
    ) -> impl IntoResponse {
        let mut parts = vec![];
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let data = field.bytes().await.unwrap().to_vec();
            parts.push(ReceivedPart {
                name,
                file_name,
                content_type,
                data,
            });
        }
        state.requests.lock().await.push(parts);
        (
            state.status,
            [(header::CONTENT_TYPE, "application/json")],
            state.body,
        )
    }
}
