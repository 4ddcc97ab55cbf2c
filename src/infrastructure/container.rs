use std::sync::Arc;

use crate::{
    application::{
        ports::{DocumentExtractor, EmbeddingProvider, LanguageModel},
        services::{
            AnswerSynthesizer, ChunkingConfig, DocumentProcessorService, EmbeddingService,
            RTSplitter, Retriever, SynthesisConfig,
        },
        use_cases::{
            AnswerQuestionUseCase, DeleteDocumentUseCase, GetDocumentUseCase,
            IngestDocumentsUseCase, ListDocumentsUseCase, SearchContentUseCase,
        },
    },
    domain::repositories::VectorStore,
    infrastructure::{
        config::{AppConfig, VectorStoreBackend},
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::PostgresVectorStore, run_migrations,
        },
        external_services::{
            InferenceClient, InferenceClientConfig, OpenAIChatModel, OpenAIEmbeddingProvider,
            PdfExtractor,
        },
        memory::InMemoryVectorStore,
    },
    presentation::http::handlers::{
        AnswerHandler, DocumentHandler, HealthHandler, IngestHandler, SearchHandler,
    },
};

pub struct AppContainer {
    // Adapters
    pub vector_store: Arc<dyn VectorStore>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub language_model: Arc<dyn LanguageModel>,
    pub document_extractor: Arc<dyn DocumentExtractor>,

    // Application Services
    pub embedding_service: Arc<EmbeddingService>,
    pub document_processor: Arc<DocumentProcessorService>,
    pub retriever: Arc<Retriever>,
    pub answer_synthesizer: Arc<AnswerSynthesizer>,

    // Use Cases
    pub ingest_documents_use_case: Arc<IngestDocumentsUseCase>,
    pub answer_question_use_case: Arc<AnswerQuestionUseCase>,
    pub search_content_use_case: Arc<SearchContentUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub get_document_use_case: Arc<GetDocumentUseCase>,
    pub delete_document_use_case: Arc<DeleteDocumentUseCase>,

    // HTTP Handlers
    pub health_handler: Arc<HealthHandler>,
    pub ingest_handler: Arc<IngestHandler>,
    pub answer_handler: Arc<AnswerHandler>,
    pub search_handler: Arc<SearchHandler>,
    pub document_handler: Arc<DocumentHandler>,
}

impl AppContainer {
    /// Connects the configured vector store and model provider, then wires
    /// everything above them.
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let vector_store: Arc<dyn VectorStore> = match config.vector_store_backend {
            VectorStoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL is required for the postgres backend")?;
                let db_pool = create_connection_pool(database_url, config.database_pool_size)?;

                let mut conn = get_connection_from_pool(&db_pool)
                    .map_err(|e| format!("Failed to create database connection: {}", e))?;
                run_migrations(&mut conn)
                    .map_err(|e| format!("Failed to run database migrations: {}", e))?;

                tracing::info!(pool_size = config.database_pool_size, "Using pgvector store");
                Arc::new(PostgresVectorStore::new(db_pool, config.embedding_dimension))
            }
            VectorStoreBackend::Memory => {
                tracing::warn!("Using in-memory vector store; documents are lost on restart");
                Arc::new(InMemoryVectorStore::new(config.embedding_dimension))
            }
        };

        let mut client_config =
            InferenceClientConfig::new(&config.openai_base_url, &config.openai_api_key);
        client_config.timeout_secs = config.provider_timeout_secs;
        client_config.max_retries = config.provider_max_retries;
        let client = InferenceClient::new(client_config.clone())
            .map_err(|e| format!("Failed to build inference client: {}", e))?;

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAIEmbeddingProvider::new(
                client,
                &config.embedding_model,
                config.embedding_dimension,
                config.embedding_max_input_chars,
            ));
        let language_model: Arc<dyn LanguageModel> = Arc::new(
            OpenAIChatModel::new(client_config, &config.chat_model)
                .map_err(|e| format!("Failed to build chat client: {}", e))?,
        );
        let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());

        Self::from_parts(
            config,
            vector_store,
            embedding_provider,
            language_model,
            document_extractor,
        )
    }

    /// Wires services, use cases and handlers on top of already-built adapters.
    pub fn from_parts(
        config: &AppConfig,
        vector_store: Arc<dyn VectorStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        language_model: Arc<dyn LanguageModel>,
        document_extractor: Arc<dyn DocumentExtractor>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        // Create application services
        let embedding_service = Arc::new(EmbeddingService::new(
            embedding_provider.clone(),
            config.embedding_batch_size,
            config.embedding_dimension,
        ));

        let splitter = RTSplitter::new(ChunkingConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })?;

        let document_processor = Arc::new(DocumentProcessorService::new(
            document_extractor.clone(),
            splitter,
            embedding_service.clone(),
            vector_store.clone(),
        ));

        let retriever = Arc::new(Retriever::new(
            embedding_service.clone(),
            vector_store.clone(),
        ));

        let answer_synthesizer = Arc::new(AnswerSynthesizer::new(
            language_model.clone(),
            SynthesisConfig {
                max_context_chars: config.max_context_chars,
                source_preview_chars: config.source_preview_chars,
                temperature: config.generation_temperature,
                max_tokens: config.generation_max_tokens,
            },
        ));

        // Create use cases
        let ingest_documents_use_case = Arc::new(IngestDocumentsUseCase::new(
            document_processor.clone(),
            config.min_documents_per_upload,
        ));
        let answer_question_use_case = Arc::new(AnswerQuestionUseCase::new(
            retriever.clone(),
            answer_synthesizer.clone(),
            config.retrieval_top_k,
        ));
        let search_content_use_case = Arc::new(SearchContentUseCase::new(
            retriever.clone(),
            config.retrieval_top_k,
        ));
        let list_documents_use_case = Arc::new(ListDocumentsUseCase::new(vector_store.clone()));
        let get_document_use_case = Arc::new(GetDocumentUseCase::new(vector_store.clone()));
        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(vector_store.clone()));

        // Create HTTP handlers
        let health_handler = Arc::new(HealthHandler::new(vector_store.clone()));
        let ingest_handler = Arc::new(IngestHandler::new(ingest_documents_use_case.clone()));
        let answer_handler = Arc::new(AnswerHandler::new(answer_question_use_case.clone()));
        let search_handler = Arc::new(SearchHandler::new(search_content_use_case.clone()));
        let document_handler = Arc::new(DocumentHandler::new(
            list_documents_use_case.clone(),
            get_document_use_case.clone(),
            delete_document_use_case.clone(),
        ));

        Ok(Self {
            vector_store,
            embedding_provider,
            language_model,
            document_extractor,
            embedding_service,
            document_processor,
            retriever,
            answer_synthesizer,
            ingest_documents_use_case,
            answer_question_use_case,
            search_content_use_case,
            list_documents_use_case,
            get_document_use_case,
            delete_document_use_case,
            health_handler,
            ingest_handler,
            answer_handler,
            search_handler,
            document_handler,
        })
    }
}
