/// Basic unit tests for the schema registry and protocol types
use jurisprudence_mcp::*;
use serde_json::json;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_registry_lists_exactly_three_tools() {
        let registry = SchemaRegistry::new();
        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["search_jurisprudence", "extract_citations", "get_abgr_summary"]
        );
    }

    #[test]
    fn test_search_tool_schema() {
        let registry = SchemaRegistry::new();
        let tool = registry.tool("search_jurisprudence").expect("search tool registered");

        assert_eq!(tool.required_arguments(), vec!["query"]);
        assert_eq!(tool.argument_default("agent_focus"), Some(&json!(false)));
        assert_eq!(tool.argument_default("max_results"), Some(&json!(5)));
        assert_eq!(tool.input_schema["properties"]["query"]["type"], "string");
        assert_eq!(tool.input_schema["properties"]["max_results"]["type"], "integer");
    }

    #[test]
    fn test_citation_tool_schema() {
        let registry = SchemaRegistry::new();
        let tool = registry.tool("extract_citations").expect("citation tool registered");

        assert_eq!(tool.required_arguments(), vec!["text"]);
        assert_eq!(tool.input_schema["properties"]["text"]["type"], "string");
    }

    #[test]
    fn test_summary_tool_schema() {
        let registry = SchemaRegistry::new();
        let tool = registry.tool("get_abgr_summary").expect("summary tool registered");

        assert!(tool.required_arguments().is_empty());
        assert_eq!(tool.argument_default("topic"), Some(&json!("all")));
    }

    #[test]
    fn test_tool_descriptor_serializes_input_schema_key() {
        let registry = SchemaRegistry::new();
        let value = serde_json::to_value(&registry.list_tools()[0]).unwrap();

        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn test_resource_descriptors() {
        let registry = SchemaRegistry::new();
        let resources = registry.list_resources();

        assert_eq!(resources.len(), 3);
        let abgr = registry
            .resource("knowledge://jurisprudence/abgr")
            .expect("abgr resource registered");
        assert_eq!(abgr.name, "Agent-Related Content (ABGR)");
        assert_eq!(abgr.mime_type, "application/json");

        let value = serde_json::to_value(abgr).unwrap();
        assert_eq!(value["mimeType"], "application/json");
    }

    #[test]
    fn test_envelopes_always_have_content() {
        assert_eq!(ResponseEnvelope::text("").content.len(), 1);
        assert_eq!(ResponseEnvelope::error("boom").content.len(), 1);
        assert_eq!(ResponseEnvelope::json(&json!([])).content.len(), 1);
    }

    #[test]
    fn test_dispatcher_names_unknown_tool() {
        let dispatcher = ToolDispatcher::new(Collaborators::sample());
        let invocation = ToolInvocation::from_value("summarize_everything", json!({}));

        let envelope = tokio_test::block_on(dispatcher.call(&invocation));

        assert!(!envelope.is_error);
        assert_eq!(envelope.text_content(), "Unknown tool: summarize_everything");
    }

    #[test]
    fn test_invocation_rejects_missing_required_argument() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Params {
            text: String,
        }

        let invocation = ToolInvocation::from_value("extract_citations", json!({}));
        let err = invocation.parse_arguments::<Params>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidArguments { .. }));
    }
}
