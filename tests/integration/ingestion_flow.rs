/// Ingestion client runs against local and mocked Azure blob stores and a mock trigger endpoint
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jurisprudence_mcp::ingestion::*;
use jurisprudence_mcp::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[cfg(test)]
mod ingestion_flow_tests {
    use super::*;

    const CONTAINER: &str = "knowledge-sources";
    const TRIGGER_PATH: &str = "/api/knowledge-ingestion";

    struct Fixture {
        dir: TempDir,
        xml_path: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let xml_path = dir.path().join("articles.xml");
            std::fs::write(&xml_path, "<articles><article id=\"1\"/></articles>").unwrap();
            Self { dir, xml_path }
        }

        fn storage_root(&self) -> PathBuf {
            self.dir.path().join("blobs")
        }

        fn client(&self, trigger: Arc<dyn IngestionTrigger>) -> IngestionClient {
            IngestionClient::new(
                Arc::new(LocalBlobStorage::new(self.storage_root())),
                trigger,
                CONTAINER,
            )
        }

        fn http_client(&self, server: &MockServer, timeout: Duration) -> IngestionClient {
            let trigger = HttpIngestionTrigger::new(
                format!("{}{}", server.uri(), TRIGGER_PATH),
                "secret-key",
                timeout,
            )
            .expect("trigger should build");
            self.client(Arc::new(trigger))
        }

        fn uploaded(&self, blob_name: &str) -> String {
            std::fs::read_to_string(self.storage_root().join(CONTAINER).join(blob_name))
                .expect("blob should exist")
        }
    }

    /// Trigger that always times out without touching the network
    struct StalledTrigger;

    #[async_trait]
    impl IngestionTrigger for StalledTrigger {
        async fn trigger(
            &self,
            _request: &IngestionRequest,
        ) -> Result<IngestionResult, TriggerError> {
            Err(TriggerError::Timeout(Duration::from_secs(300)))
        }
    }

    #[tokio::test]
    async fn test_successful_ingestion() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TRIGGER_PATH))
            .and(header("x-functions-key", "secret-key"))
            .and(body_json(json!({
                "tenantId": "government-canada",
                "blobName": "articles.xml",
                "containerName": CONTAINER,
                "abgrOnly": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "summary": {"durationMs": 1200, "totalArticles": 1, "ingested": 1, "succeeded": 1},
                "abgr_stats": {"relevant": 1, "categories": {"licensing": 1}},
                "errors": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = fixture.http_client(&server, Duration::from_secs(5));
        let result = client
            .ingest(&fixture.xml_path, "government-canada", true, None)
            .await
            .expect("ingestion should succeed");

        assert!(result.success);
        assert_eq!(result.summary.total_articles, 1);
        assert_eq!(result.abgr_stats.categories.get("licensing"), Some(&1));
        assert!(!result.is_timeout());
        assert_eq!(
            fixture.uploaded("articles.xml"),
            "<articles><article id=\"1\"/></articles>"
        );
    }

    #[tokio::test]
    async fn test_blob_name_override() {
        let fixture = Fixture::new();
        let client = fixture.client(Arc::new(StalledTrigger));

        let receipt = client
            .upload(&fixture.xml_path, Some("r2r3.xml"))
            .await
            .expect("upload should succeed");

        assert_eq!(receipt.container, CONTAINER);
        assert_eq!(receipt.blob_name, "r2r3.xml");
        assert_eq!(receipt.size_bytes, 38);
        assert!(fixture.uploaded("r2r3.xml").starts_with("<articles>"));
    }

    #[tokio::test]
    async fn test_http_error_carries_body() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TRIGGER_PATH))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "Blob not found: articles.xml"})),
            )
            .mount(&server)
            .await;

        let client = fixture.http_client(&server, Duration::from_secs(5));
        let err = client
            .ingest(&fixture.xml_path, "tenant", false, None)
            .await
            .unwrap_err();

        match err {
            IngestionError::Trigger(TriggerError::Http { status, detail }) => {
                assert_eq!(status, 400);
                assert!(detail.contains("Blob not found: articles.xml"));
            }
            other => panic!("expected HTTP trigger error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_trigger_reports_timeout() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TRIGGER_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = fixture.http_client(&server, Duration::from_millis(50));
        let result = client
            .ingest(&fixture.xml_path, "tenant", true, None)
            .await
            .expect("timeout is reported as a result");

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("timeout"));
        assert!(result.is_timeout());
        // The upload happened before the trigger stalled
        assert!(fixture.uploaded("articles.xml").contains("<article"));
    }

    #[tokio::test]
    async fn test_stalled_trigger_is_downgraded() {
        let fixture = Fixture::new();
        let client = fixture.client(Arc::new(StalledTrigger));

        let result = client
            .ingest(&fixture.xml_path, "tenant", false, None)
            .await
            .unwrap();

        assert_eq!(result, IngestionResult::timed_out());
    }

    #[tokio::test]
    async fn test_missing_file_skips_upload_and_trigger() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = fixture.http_client(&server, Duration::from_secs(5));
        let missing = fixture.dir.path().join("nope.xml");
        let err = client
            .ingest(&missing, "tenant", false, None)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestionError::FileNotFound { ref path } if path == &missing));
        assert!(!fixture.storage_root().join(CONTAINER).exists());
    }

    #[tokio::test]
    async fn test_reupload_overwrites_existing_blob() {
        let fixture = Fixture::new();
        std::fs::create_dir_all(fixture.storage_root().join(CONTAINER)).unwrap();
        std::fs::write(
            fixture.storage_root().join(CONTAINER).join("articles.xml"),
            "stale content",
        )
        .unwrap();

        let client = fixture.client(Arc::new(StalledTrigger));
        client.upload(&fixture.xml_path, None).await.unwrap();

        assert_eq!(
            fixture.uploaded("articles.xml"),
            "<articles><article id=\"1\"/></articles>"
        );
    }

    #[tokio::test]
    async fn test_unsafe_blob_name_is_rejected() {
        let fixture = Fixture::new();
        let client = fixture.client(Arc::new(StalledTrigger));

        let err = client
            .upload(&fixture.xml_path, Some("../escape.xml"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestionError::Storage(StorageError::InvalidName { .. })
        ));
        assert!(!fixture.dir.path().join("escape.xml").exists());
        // Rejected before the container is touched
        assert!(!fixture.storage_root().join(CONTAINER).exists());
    }

    const XML: &str = "<articles><article id=\"1\"/></articles>";

    fn azure_client(server: &MockServer, credential: BlobCredential) -> IngestionClient {
        let timeout = Duration::from_secs(5);
        let storage = AzureBlobStorage::new(server.uri(), credential, timeout).unwrap();
        let trigger = HttpIngestionTrigger::new(
            format!("{}{}", server.uri(), TRIGGER_PATH),
            "secret-key",
            timeout,
        )
        .unwrap();
        IngestionClient::new(Arc::new(storage), Arc::new(trigger), CONTAINER)
    }

    async fn mount_trigger(server: &MockServer, calls: u64) {
        Mock::given(method("POST"))
            .and(path(TRIGGER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_azure_upload_creates_container_then_triggers() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;
        let container_path = format!("/{}", CONTAINER);

        Mock::given(method("GET"))
            .and(path(container_path.as_str()))
            .and(query_param("restype", "container"))
            .and(query_param("sig", "abc"))
            .respond_with(ResponseTemplate::new(404).insert_header("x-ms-error-code", "ContainerNotFound"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(container_path.as_str()))
            .and(query_param("restype", "container"))
            .and(query_param("sig", "abc"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/articles.xml", container_path).as_str()))
            .and(query_param("sig", "abc"))
            .and(header("x-ms-blob-type", "BlockBlob"))
            .and(header("x-ms-version", "2023-11-03"))
            .and(body_string(XML))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        mount_trigger(&server, 1).await;

        let client = azure_client(&server, BlobCredential::SasToken("sv=2022-11-02&sig=abc".to_string()));
        let result = client
            .ingest(&fixture.xml_path, "government-canada", false, None)
            .await
            .expect("ingestion should succeed");

        assert!(result.success);
    }

    #[tokio::test]
    async fn test_azure_existing_container_is_reused() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;
        let container_path = format!("/{}", CONTAINER);

        Mock::given(method("GET"))
            .and(path(container_path.as_str()))
            .and(query_param("restype", "container"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(container_path.as_str()))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/articles.xml", container_path).as_str()))
            .and(header("authorization", "Bearer entra-token"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let client = azure_client(&server, BlobCredential::BearerToken("entra-token".to_string()));
        for _ in 0..2 {
            let receipt = client.upload(&fixture.xml_path, None).await.unwrap();
            assert_eq!(receipt.size_bytes, XML.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_azure_rejected_upload_skips_trigger() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;
        let container_path = format!("/{}", CONTAINER);

        Mock::given(method("GET"))
            .and(path(container_path.as_str()))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/articles.xml", container_path).as_str()))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ms-error-code", "AuthorizationPermissionMismatch"),
            )
            .mount(&server)
            .await;
        mount_trigger(&server, 0).await;

        let client = azure_client(&server, BlobCredential::Anonymous);
        let err = client
            .ingest(&fixture.xml_path, "tenant", false, None)
            .await
            .unwrap_err();

        match err {
            IngestionError::Storage(StorageError::Http { status, detail }) => {
                assert_eq!(status, 403);
                assert!(detail.contains("AuthorizationPermissionMismatch"));
            }
            other => panic!("expected storage HTTP error, got {:?}", other),
        }
    }
}
