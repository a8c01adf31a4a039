//! HTTP surface for the PDF assistant.
//!
//! - `GET /` – Browser front end: upload, pick a mode, read the result.
//! - `POST /documents?file_name=…` – Raw PDF body. Extracts and caches the text, returning the
//!   document id. Responds `422` with a warning when the PDF yields no text.
//! - `GET /documents/:id` – Metadata for a cached document.
//! - `DELETE /documents/:id` – Forget a cached document.
//! - `POST /documents/:id/summary` – Five-bullet summary. Provider failures are reported inline
//!   (`200` with an `error` field and an empty summary).
//! - `GET /documents/:id/summary.txt` – Latest summary as a plain-text download.
//! - `POST /documents/:id/questions` – Answer `{ "question": … }` from the document only.
//! - `GET /metrics` – Extraction and inference counters.
//! - `GET /commands` – Machine-readable command catalog.

use crate::service::{AssistantService, ServiceError};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const DEFAULT_FILE_NAME: &str = "document.pdf";
const SUMMARY_FILE_NAME: &str = "summary.txt";
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Build the HTTP router.
pub fn create_router(service: Arc<AssistantService>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/documents", post(upload_document))
        .route(
            "/documents/:id",
            get(get_document).delete(delete_document),
        )
        .route("/documents/:id/summary", post(summarize_document))
        .route("/documents/:id/summary.txt", get(download_summary))
        .route("/documents/:id/questions", post(ask_question))
        .route("/metrics", get(get_metrics))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Deserialize)]
struct UploadParams {
    #[serde(default)]
    file_name: Option<String>,
}

/// Metadata returned for a cached document.
#[derive(Serialize)]
struct DocumentResponse {
    document_id: Uuid,
    file_name: String,
    pages: usize,
    characters: usize,
    uploaded_at: String,
    has_summary: bool,
}

impl From<crate::documents::StoredDocument> for DocumentResponse {
    fn from(document: crate::documents::StoredDocument) -> Self {
        Self {
            document_id: document.id,
            characters: document.char_count(),
            file_name: document.file_name,
            pages: document.pages,
            uploaded_at: document.uploaded_at,
            has_summary: document.last_summary.is_some(),
        }
    }
}

/// Extract and cache an uploaded PDF.
async fn upload_document(
    State(service): State<Arc<AssistantService>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let file_name = params
        .file_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    let document = service.upload(file_name, body.to_vec()).await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

async fn get_document(
    State(service): State<Arc<AssistantService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    Ok(Json(service.document(id).await?.into()))
}

async fn delete_document(
    State(service): State<Arc<AssistantService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.forget(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response body for `POST /documents/:id/summary`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn summarize_document(
    State(service): State<Arc<AssistantService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let completion = service.summarize(id).await?;
    tracing::info!(document_id = %id, ok = completion.is_reply(), "Summary request completed");
    Ok(Json(SummaryResponse {
        error: completion.error_message().map(str::to_string),
        summary: completion.text().to_string(),
    }))
}

async fn download_summary(
    State(service): State<Arc<AssistantService>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let summary = service.summary_text(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SUMMARY_FILE_NAME}\""),
            ),
        ],
        summary,
    )
        .into_response())
}

/// Request body for `POST /documents/:id/questions`.
#[derive(Deserialize)]
struct QuestionRequest {
    #[serde(default)]
    question: String,
}

/// Response body for `POST /documents/:id/questions`.
#[derive(Serialize)]
struct AnswerResponse {
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn ask_question(
    State(service): State<Arc<AssistantService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let completion = service.ask(id, &request.question).await?;
    tracing::info!(document_id = %id, ok = completion.is_reply(), "Question request completed");
    Ok(Json(AnswerResponse {
        error: completion.error_message().map(str::to_string),
        answer: completion.text().to_string(),
    }))
}

async fn get_metrics(
    State(service): State<Arc<AssistantService>>,
) -> Json<crate::metrics::MetricsSnapshot> {
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/documents?file_name=report.pdf",
                description: "Upload raw PDF bytes. Returns { \"document_id\", \"pages\", \"characters\" } or 422 when no text could be extracted.",
                request_example: None,
            },
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/documents/{document_id}/summary",
                description: "Summarize the document as five bullet points for business readers.",
                request_example: None,
            },
            CommandDescriptor {
                name: "download_summary",
                method: "GET",
                path: "/documents/{document_id}/summary.txt",
                description: "Download the latest summary as summary.txt.",
                request_example: None,
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/documents/{document_id}/questions",
                description: "Answer a question using only the document's text.",
                request_example: Some(json!({ "question": "How much did revenue grow?" })),
            },
            CommandDescriptor {
                name: "forget",
                method: "DELETE",
                path: "/documents/{document_id}",
                description: "Drop the cached text for a document.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return extraction and inference counters.",
                request_example: None,
            },
        ],
    })
}

struct ApiError(ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let (status, body) = match &self.0 {
            ServiceError::Unreadable { cause } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "warning": message,
                    "detail": cause.as_ref().map(|error| format!("Error reading the PDF: {error}")),
                }),
            ),
            ServiceError::Rejected(_) => (StatusCode::BAD_REQUEST, json!({ "warning": message })),
            ServiceError::DocumentNotFound(_) | ServiceError::NoSummary(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            ServiceError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(inner: ServiceError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{INDEX_HTML, MAX_UPLOAD_BYTES, create_router, get_commands};
    use crate::assistant::{ANSWER_FALLBACK, testing::RecordingClient};
    use crate::extraction::{TextExtractor, fixtures::pdf_with_pages};
    use crate::inference::InferenceError;
    use crate::service::AssistantService;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(client: Arc<RecordingClient>) -> Router {
        create_router(Arc::new(AssistantService::with_parts(
            TextExtractor::default(),
            client,
        )))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, body.to_vec())
    }

    fn json_of(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("json body")
    }

    async fn upload(app: &Router, bytes: Vec<u8>) -> (StatusCode, Value) {
        let (status, body) = send(
            app,
            Request::builder()
                .method(Method::POST)
                .uri("/documents?file_name=q2.pdf")
                .header("content-type", "application/pdf")
                .body(Body::from(bytes))
                .expect("request"),
        )
        .await;
        (status, json_of(&body))
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn commands_catalog_exposes_document_routes() {
        let commands = get_commands().await.0.commands;
        let ask = commands
            .iter()
            .find(|cmd| cmd.name == "ask")
            .expect("ask command present");

        assert_eq!(ask.method, "POST");
        assert!(ask.path.ends_with("/questions"));
        assert!(commands.iter().any(|cmd| cmd.name == "summarize"));
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let app = app(Arc::new(RecordingClient::default()));
        let (status, body) = send(
            &app,
            Request::builder().uri("/").body(Body::empty()).expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("PDF Document Assistant"));
    }

    #[tokio::test]
    async fn upload_summarize_and_download() {
        let client = Arc::new(RecordingClient::replying(&["- Revenue grew 10%"]));
        let app = app(client.clone());

        let (status, uploaded) = upload(&app, pdf_with_pages(&["Revenue grew 10% in Q2."])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(uploaded["file_name"], "q2.pdf");
        assert_eq!(uploaded["pages"], 1);
        let id = uploaded["document_id"].as_str().expect("id").to_string();

        let (status, body) = send(&app, post_json(&format!("/documents/{id}/summary"), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let summary = json_of(&body);
        assert_eq!(summary["summary"], "- Revenue grew 10%");
        assert!(summary.get("error").is_none());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/documents/{id}/summary.txt"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("summary.txt"));
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], b"- Revenue grew 10%");

        let requests = client.requests().await;
        assert_eq!(requests[0][1].content.trim(), "Revenue grew 10% in Q2.");
    }

    #[tokio::test]
    async fn unreadable_upload_returns_warning() {
        let app = app(Arc::new(RecordingClient::default()));

        let (status, body) = upload(&app, b"plain text, not a pdf".to_vec()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["warning"], "This PDF seems empty or could not be parsed.");
        assert!(
            body["detail"]
                .as_str()
                .is_some_and(|detail| detail.starts_with("Error reading the PDF"))
        );
    }

    #[tokio::test]
    async fn blank_question_is_rejected_without_provider_call() {
        let client = Arc::new(RecordingClient::default());
        let app = app(client.clone());
        let (_, uploaded) = upload(&app, pdf_with_pages(&["Body"])).await;
        let id = uploaded["document_id"].as_str().expect("id").to_string();

        let (status, body) = send(
            &app,
            post_json(&format!("/documents/{id}/questions"), json!({ "question": "   " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["warning"], "Please enter a question.");
        assert!(client.requests().await.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_reported_inline() {
        let client = Arc::new(RecordingClient::failing(InferenceError::Transport(
            "connection refused".into(),
        )));
        let app = app(client);
        let (_, uploaded) = upload(&app, pdf_with_pages(&["Body"])).await;
        let id = uploaded["document_id"].as_str().expect("id").to_string();

        let (status, body) = send(
            &app,
            post_json(&format!("/documents/{id}/questions"), json!({ "question": "Why?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let answer = json_of(&body);
        assert_eq!(answer["answer"], ANSWER_FALLBACK);
        assert!(
            answer["error"]
                .as_str()
                .is_some_and(|error| error.contains("connection refused"))
        );
    }

    #[tokio::test]
    async fn unknown_document_is_not_found() {
        let app = app(Arc::new(RecordingClient::default()));
        let id = uuid::Uuid::new_v4();

        let (status, _) = send(&app, post_json(&format!("/documents/{id}/summary"), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Request::builder()
                .uri(format!("/documents/{id}/summary.txt"))
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_forgets_document() {
        let app = app(Arc::new(RecordingClient::default()));
        let (_, uploaded) = upload(&app, pdf_with_pages(&["Body"])).await;
        let id = uploaded["document_id"].as_str().expect("id").to_string();

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/documents/{id}"))
            .body(Body::empty())
            .expect("request");
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            Request::builder()
                .uri(format!("/documents/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_with_plain_text() {
        let app = app(Arc::new(RecordingClient::default()));
        let (status, body) = send(
            &app,
            Request::builder()
                .method(Method::POST)
                .uri("/documents?file_name=huge.pdf")
                .body(Body::from(vec![b'x'; MAX_UPLOAD_BYTES + 1]))
                .expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(serde_json::from_slice::<Value>(&body).is_err());
    }

    #[test]
    fn page_tolerates_non_json_errors_and_releases_replaced_documents() {
        assert!(INDEX_HTML.contains("response.json().catch(() => ({}))"));
        assert!(INDEX_HTML.contains("response.status === 413"));
        assert!(!INDEX_HTML.contains("await response.json()"));
        assert!(INDEX_HTML.contains("method: 'DELETE'"));
    }

    #[tokio::test]
    async fn metrics_reflect_activity() {
        let app = app(Arc::new(RecordingClient::replying(&["- ok"])));
        let (_, uploaded) = upload(&app, pdf_with_pages(&["Body"])).await;
        let id = uploaded["document_id"].as_str().expect("id").to_string();
        send(&app, post_json(&format!("/documents/{id}/summary"), json!({}))).await;

        let (status, body) = send(
            &app,
            Request::builder().uri("/metrics").body(Body::empty()).expect("request"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let metrics = json_of(&body);
        assert_eq!(metrics["documents_extracted"], 1);
        assert_eq!(metrics["summaries_generated"], 1);
    }
}
