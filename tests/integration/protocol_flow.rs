/// End-to-end JSON-RPC sessions over an in-memory transport
use std::path::PathBuf;
use std::sync::Arc;

use jurisprudence_mcp::*;
use serde_json::{json, Value};
use tokio::io::BufReader;

use crate::common::*;

#[cfg(test)]
mod protocol_flow_tests {
    use super::*;

    fn sample_server() -> McpServer {
        McpServer::new(Router::with_collaborators(
            PathBuf::from("missing.xml"),
            Collaborators::sample(),
        ))
    }

    /// Feed `requests` to the server one per line and collect the responses
    async fn session(server: &McpServer, requests: &[Value]) -> Vec<Value> {
        let input: String = requests
            .iter()
            .map(|request| format!("{}\n", request))
            .collect();
        let mut output: Vec<u8> = Vec::new();

        server
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .expect("session should complete");

        String::from_utf8(output)
            .expect("utf-8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is JSON"))
            .collect()
    }

    fn call(id: u64, name: &str, arguments: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        })
    }

    /// Decode the JSON body of a successful tool result
    fn tool_body(response: &Value) -> Value {
        let result = &response["result"];
        assert_eq!(result["isError"], false, "unexpected error: {}", result);
        let text = result["content"][0]["text"].as_str().expect("text block");
        serde_json::from_str(text).expect("tool body is JSON")
    }

    #[tokio::test]
    async fn test_initialize_list_and_call() {
        let server = sample_server();
        let responses = session(
            &server,
            &[
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "0.1"}
                }}),
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
                json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
                call(4, "get_abgr_summary", json!({})),
            ],
        )
        .await;

        // The notification produced no line
        assert_eq!(responses.len(), 4);
        let ids: Vec<_> = responses.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4)]);

        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "eva-foundation-knowledge");

        let tools = responses[1]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["query"]));

        let resources = responses[2]["result"]["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0]["uri"], "knowledge://jurisprudence/all");

        let summary = tool_body(&responses[3]);
        assert_eq!(summary["topic"], "all");
        assert_eq!(summary["abgr_summary"]["total_regulations"], 15);
        assert_eq!(summary["knowledge_source"], "AssistMe Jurisprudence Database");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_named() {
        let server = sample_server();
        let responses = session(&server, &[call(7, "drop_tables", json!({"x": 1}))]).await;

        let result = &responses[0]["result"];
        assert_eq!(result["content"][0]["text"], "Unknown tool: drop_tables");
        assert!(responses[0].get("error").is_none());
    }

    #[tokio::test]
    async fn test_search_respects_available_documents() {
        let server = sample_server();
        let responses = session(
            &server,
            &[call(
                1,
                "search_jurisprudence",
                json!({"query": "agent licensing", "agent_focus": true, "max_results": 10}),
            )],
        )
        .await;

        let body = tool_body(&responses[0]);
        let results = body["results"].as_array().unwrap();

        assert_eq!(body["query"], "agent licensing");
        assert_eq!(body["total_found"], 3);
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            let first = pair[0]["relevance_score"].as_f64().unwrap();
            let second = pair[1]["relevance_score"].as_f64().unwrap();
            assert!(first > second);
        }
        assert!(results.iter().all(|r| r["abgr_related"] == true));
    }

    #[tokio::test]
    async fn test_search_defaults_apply() {
        let server = McpServer::new(Router::with_collaborators(
            PathBuf::from("missing.xml"),
            Collaborators::sample().with_search(Arc::new(SloppySearchEngine)),
        ));
        let responses =
            session(&server, &[call(1, "search_jurisprudence", json!({"query": "q"}))]).await;

        let body = tool_body(&responses[0]);
        let results = body["results"].as_array().unwrap();

        assert_eq!(body["agent_focus"], false);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0]["title"], "Decision 9");
        assert_eq!(results[4]["title"], "Decision 5");
        assert!(results.iter().all(|r| r["abgr_related"] == false));
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_error_envelope() {
        let server = sample_server();
        let responses = session(
            &server,
            &[
                call(1, "search_jurisprudence", json!({"agent_focus": true})),
                call(2, "search_jurisprudence", json!({"query": "   "})),
                call(3, "extract_citations", json!({"text": 12})),
            ],
        )
        .await;

        assert_eq!(responses.len(), 3);
        for response in &responses {
            let result = &response["result"];
            assert_eq!(result["isError"], true);
            assert!(result["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Error: "));
        }
    }

    #[tokio::test]
    async fn test_citation_preview_is_truncated_but_extractor_sees_all() {
        let recorder = Arc::new(RecordingCitationExtractor::default());
        let server = McpServer::new(Router::with_collaborators(
            PathBuf::from("missing.xml"),
            Collaborators::sample().with_citations(recorder.clone()),
        ));
        let text = format!("Under the Public Service Act, s. 45, {}", "x".repeat(200));

        let responses =
            session(&server, &[call(1, "extract_citations", json!({"text": text.clone()}))]).await;
        let body = tool_body(&responses[0]);

        let preview = body["text_analyzed"].as_str().unwrap();
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
        assert!(text.starts_with(preview.trim_end_matches("...")));
        assert_eq!(body["citations_found"][0]["type"], "statute");
        assert_eq!(body["extraction_confidence"], 0.5);

        assert_eq!(*recorder.seen.lock().unwrap(), vec![text]);
    }

    #[tokio::test]
    async fn test_resource_reads_over_the_wire() {
        let server = sample_server();
        let responses = session(
            &server,
            &[
                json!({"jsonrpc": "2.0", "id": 1, "method": "resources/read",
                       "params": {"uri": "knowledge://jurisprudence/abgr"}}),
                json!({"jsonrpc": "2.0", "id": 2, "method": "resources/read",
                       "params": {"uri": "knowledge://nowhere"}}),
                json!({"jsonrpc": "2.0", "id": 3, "method": "resources/subscribe",
                       "params": {"uri": "knowledge://jurisprudence/abgr"}}),
            ],
        )
        .await;

        let abgr = &responses[0]["result"]["contents"][0];
        assert_eq!(abgr["mimeType"], "application/json");
        let body: Value = serde_json::from_str(abgr["text"].as_str().unwrap()).unwrap();
        assert!(body["abgr_content"]["agent_regulations"].is_array());

        let unknown = &responses[1]["result"]["contents"][0];
        assert_eq!(unknown["text"], "Unknown resource: knowledge://nowhere");
        assert_eq!(unknown["mimeType"], "text/plain");

        assert_eq!(responses[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_malformed_lines_do_not_end_the_session() {
        let server = sample_server();
        let input = concat!(
            "{not json\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"ping\"}\n",
        );
        let mut output: Vec<u8> = Vec::new();

        server
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], -32700);
        assert_eq!(lines[1]["id"], 5);
        assert_eq!(lines[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_answered_and_session_continues() {
        let server = sample_server();
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        let mut output: Vec<u8> = Vec::new();

        server
            .serve(BufReader::new(input.as_slice()), &mut output)
            .await
            .expect("session should complete");

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], Value::Null);
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_null_arguments_use_defaults() {
        let server = sample_server();
        let responses = session(&server, &[call(1, "get_abgr_summary", Value::Null)]).await;

        assert!(responses[0].get("error").is_none());
        let body = tool_body(&responses[0]);
        assert_eq!(body["topic"], "all");
        assert_eq!(body["abgr_summary"]["total_regulations"], 15);
    }
}
