use axum::{Router, http::StatusCode};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::{AppConfig, AppContainer};
use crate::presentation::http::{
    handlers::{AnswerHandler, DocumentHandler, HealthHandler, IngestHandler, SearchHandler},
    routes::{answer_routes, document_routes, health_routes, ingest_routes, search_routes},
};

pub struct HttpServer {
    health_handler: Arc<HealthHandler>,
    ingest_handler: Arc<IngestHandler>,
    answer_handler: Arc<AnswerHandler>,
    search_handler: Arc<SearchHandler>,
    document_handler: Arc<DocumentHandler>,
    port: u16,
    max_upload_bytes: usize,
    request_timeout: Duration,
}

impl HttpServer {
    pub fn new(container: &AppContainer, config: &AppConfig) -> Self {
        Self {
            health_handler: container.health_handler.clone(),
            ingest_handler: container.ingest_handler.clone(),
            answer_handler: container.answer_handler.clone(),
            search_handler: container.search_handler.clone(),
            document_handler: container.document_handler.clone(),
            port: config.api_port,
            max_upload_bytes: config.max_upload_bytes,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes(self.health_handler.clone()))
            .merge(ingest_routes(
                self.ingest_handler.clone(),
                self.max_upload_bytes,
            ))
            .merge(answer_routes(self.answer_handler.clone()))
            .merge(search_routes(self.search_handler.clone()))
            .merge(document_routes(self.document_handler.clone()))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(self.max_upload_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.request_timeout,
            ))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::LanguageModel;
    use crate::application::ports::language_model::{
        GenerationError, GenerationRequest, GenerationResponse,
    };
    use crate::infrastructure::memory::InMemoryVectorStore;
    use crate::test_support::{
        FailingLanguageModel, PlainTextExtractor, RecordingLanguageModel, UNAUTHORIZED_MARKER,
        VocabularyEmbedder, pdf_bytes,
    };

    const BOUNDARY: &str = "pdfrag-test-boundary";

    struct SlowLanguageModel(Duration);

    #[async_trait]
    impl LanguageModel for SlowLanguageModel {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            tokio::time::sleep(self.0).await;
            Ok(GenerationResponse {
                text: "Too late.".to_string(),
                model: "slow".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
        let mut vars: HashMap<&str, &str> = HashMap::from([
            ("VECTOR_STORE_BACKEND", "memory"),
            ("OPENAI_API_KEY", "sk-test"),
            ("EMBEDDING_DIMENSION", "8"),
        ]);
        vars.extend(overrides.iter().copied());
        AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
    }

    fn app_with_model(language_model: Arc<dyn LanguageModel>) -> Router {
        build_app(test_config(&[]), language_model)
    }

    fn build_app(config: AppConfig, language_model: Arc<dyn LanguageModel>) -> Router {
        let container = AppContainer::from_parts(
            &config,
            Arc::new(InMemoryVectorStore::new(config.embedding_dimension)),
            Arc::new(VocabularyEmbedder::new()),
            language_model,
            Arc::new(PlainTextExtractor::new()),
        )
        .unwrap();
        HttpServer::new(&container, &config).router()
    }

    fn app() -> Router {
        app_with_model(Arc::new(RecordingLanguageModel::new("Alpha comes first.")))
    }

    fn multipart_body(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (filename, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn ingest_request(files: &[(&str, Vec<u8>)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn ingest_letters(app: &Router) -> Value {
        let (status, body) = send(
            app,
            ingest_request(&[
                ("a.pdf", pdf_bytes(&["Alpha Beta"])),
                ("b.pdf", pdf_bytes(&["Gamma Delta"])),
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_health_reports_vector_store() {
        let (status, body) = send(&app(), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["vector_store"], "reachable");
    }

    #[tokio::test]
    async fn test_ingest_then_answer_and_search() {
        let app = app();

        let body = ingest_letters(&app).await;
        assert_eq!(body["data"]["ingested"], 2);
        assert_eq!(body["data"]["documents"][0]["status"], "ingested");
        assert_eq!(body["data"]["documents"][0]["filename"], "a.pdf");
        assert_eq!(body["data"]["documents"][0]["total_chunks"], 1);
        let alpha_id = body["data"]["documents"][0]["document_id"].clone();

        let (status, body) = send(
            &app,
            json_request("POST", "/answer", json!({"question": "What is Alpha?", "top_k": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "generated");
        assert_eq!(body["data"]["answer"], "Alpha comes first.");
        assert_eq!(body["data"]["sources"][0]["document_id"], alpha_id);
        assert_eq!(body["data"]["sources"][0]["page_number"], 1);

        let (status, body) = send(&app, get("/search?query=gamma&top_k=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_results"], 2);
        assert_eq!(body["data"]["results"][0]["text"], "Gamma Delta");
    }

    #[tokio::test]
    async fn test_answer_on_empty_corpus_is_the_fallback() {
        let (status, body) = send(
            &app(),
            json_request("POST", "/answer", json!({"question": "What is Alpha?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "no_relevant_information");
        assert_eq!(body["data"]["sources"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_questions_are_bad_requests() {
        let app = app();

        for payload in [
            json!({"question": "   "}),
            json!({"question": "What is Alpha?", "top_k": 0}),
        ] {
            let (status, body) = send(&app, json_request("POST", "/answer", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["code"], "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn test_generation_failure_is_a_bad_gateway() {
        let app = app_with_model(Arc::new(FailingLanguageModel));
        ingest_letters(&app).await;

        let (status, body) = send(
            &app,
            json_request("POST", "/answer", json!({"question": "What is Alpha?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "GENERATION_FAILED");
    }

    #[tokio::test]
    async fn test_slow_request_hits_the_deadline() {
        let config = test_config(&[("REQUEST_TIMEOUT_SECS", "1")]);
        let app = build_app(config, Arc::new(SlowLanguageModel(Duration::from_secs(3))));
        ingest_letters(&app).await;

        let started = std::time::Instant::now();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/answer",
                json!({"question": "What is Alpha?"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_single_document_upload_is_rejected() {
        let app = app();

        let (status, body) = send(&app, ingest_request(&[("a.pdf", pdf_bytes(&["Alpha"]))])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_UPLOAD");

        let (_, body) = send(&app, get("/documents")).await;
        assert_eq!(body["data"]["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_unreadable_document_fails_alone() {
        let (status, body) = send(
            &app(),
            ingest_request(&[
                ("broken.pdf", b"not a pdf".to_vec()),
                ("a.pdf", pdf_bytes(&["Alpha"])),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["documents"][0]["status"], "failed");
        assert!(body["data"]["documents"][0]["error"].is_string());
        assert_eq!(body["data"]["documents"][1]["status"], "ingested");
        assert_eq!(body["data"]["failed"], 1);
    }

    #[tokio::test]
    async fn test_aborted_upload_lists_stored_documents() {
        let app = app();

        let (status, body) = send(
            &app,
            ingest_request(&[
                ("a.pdf", pdf_bytes(&["Alpha Beta"])),
                ("locked.pdf", pdf_bytes(&[UNAUTHORIZED_MARKER])),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INGESTION_ABORTED");
        assert_eq!(body["data"]["ingested"], 1);
        assert_eq!(body["data"]["documents"][0]["status"], "ingested");
        assert_eq!(body["data"]["documents"][1]["status"], "failed");
        let stored_id = body["data"]["documents"][0]["document_id"].clone();

        let (_, body) = send(&app, get("/documents")).await;
        assert_eq!(body["data"]["meta"]["total"], 1);
        assert_eq!(body["data"]["documents"][0]["id"], stored_id);
    }

    #[tokio::test]
    async fn test_document_lifecycle() {
        let app = app();
        let body = ingest_letters(&app).await;
        let id = body["data"]["documents"][1]["document_id"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = send(&app, get("/documents?skip=0&limit=10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["meta"]["total"], 2);
        assert_eq!(body["data"]["documents"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, get(&format!("/documents/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["filename"], "b.pdf");
        assert_eq!(body["data"]["total_chunks"], 1);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/documents/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["document_id"], id.as_str());
        assert_eq!(body["data"]["deleted"], true);

        let (status, body) = send(&app, get(&format!("/documents/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "DOCUMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/documents/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app(), delete).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_rejected() {
        let (status, body) = send(&app(), get("/documents?limit=0")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PAGINATION");
    }
}
