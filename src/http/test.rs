#[cfg(test)]
mod tests {
    use crate::api::{ApiError, MutationGateway, WorkflowTransport};
    use crate::config::{ApiConfig, RateLimitConfig};
    use crate::http::HttpWorkflowClient;
    use crate::workflows::{ListParams, WorkflowStatus};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_config(root: &str) -> ApiConfig {
        ApiConfig {
            root: root.to_string(),
            token: None,
            timeout_seconds: 5,
            rate_limit: RateLimitConfig {
                requests_per_second: 50,
                burst_capacity: 50,
            },
        }
    }

    fn params(status: Option<&str>, workflow_id: Option<&str>) -> ListParams {
        ListParams {
            page: 1,
            size: 10,
            status: status.map(str::to_string),
            workflow_id: workflow_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_omits_inactive_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflow"))
            .and(query_param("page", "1"))
            .and(query_param("size", "10"))
            .and(query_param_is_missing("status"))
            .and(query_param_is_missing("workflow_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "workflows": [{
                    "workflow_id": "wf-1",
                    "workflow_name": "orders",
                    "status": 1,
                    "total_instances": 3,
                    "total_running_instances": 1,
                    "total_failed_instances": 0,
                    "create_time": "2024-01-02T03:04:05Z",
                    "update_time": "2024-01-02T03:04:05Z"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpWorkflowClient::new(&api_config(&server.uri())).unwrap();
        let page = client.list_workflows(&params(None, None)).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "wf-1");
        assert_eq!(page.items[0].status, WorkflowStatus::Running);
    }

    #[tokio::test]
    async fn test_list_sends_active_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflow"))
            .and(query_param("status", "1"))
            .and(query_param("workflow_id", "wf-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 0,
                "workflows": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpWorkflowClient::new(&api_config(&server.uri())).unwrap();
        let page = client
            .list_workflows(&params(Some("1"), Some("wf-123")))
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_api_root_with_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workflow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 0,
                "workflows": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let root = format!("{}/api/v1/", server.uri());
        let client = HttpWorkflowClient::new(&api_config(&root)).unwrap();
        assert!(client.list_workflows(&params(None, None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflow"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = HttpWorkflowClient::new(&api_config(&server.uri())).unwrap();
        let err = client.list_workflows(&params(None, None)).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 503,
                body: "maintenance".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflow"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = HttpWorkflowClient::new(&api_config(&server.uri())).unwrap();
        let err = client.list_workflows(&params(None, None)).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_delete_hits_workflow_path_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/workflow/wf-9"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = api_config(&server.uri());
        config.token = Some("secret".to_string());
        let client = HttpWorkflowClient::new(&config).unwrap();

        client.delete_workflow("wf-9").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_raw_payload() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/workflow/wf-9"))
            .respond_with(ResponseTemplate::new(400).set_body_string("workflow is running"))
            .mount(&server)
            .await;

        let client = HttpWorkflowClient::new(&api_config(&server.uri())).unwrap();
        let err = client.delete_workflow("wf-9").await.unwrap_err();
        assert_eq!(err.payload(), "workflow is running");
    }

    #[test]
    fn test_rejects_non_http_root() {
        let err = HttpWorkflowClient::new(&api_config("ftp://example.com")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig { .. }));

        let mut config = api_config("http://localhost:1");
        config.rate_limit.requests_per_second = 0;
        assert!(HttpWorkflowClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is closed on test machines
        let client = HttpWorkflowClient::new(&api_config("http://127.0.0.1:9")).unwrap();
        let err = client.list_workflows(&params(None, None)).await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. } | ApiError::Timeout { .. }));
    }
}
