//! Web search tool: searches a small built-in knowledge base.
//!
//! Stands in for a real search API so the agent loop and the ReAct prompt
//! can be exercised without network access.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolOutput};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
struct Entry {
    key: &'static str,
    title: &'static str,
    content: &'static str,
    url: &'static str,
}

const KNOWLEDGE_BASE: &[Entry] = &[
    Entry {
        key: "langgraph",
        title: "LangGraph - Build Stateful AI Agents",
        content: "LangGraph is a library for building stateful, multi-actor applications with LLMs. \
                  It extends LangChain with cyclic computational capabilities, enabling complex agent workflows. \
                  Key features: State management, Conditional edges, Parallel execution, Human-in-the-loop.",
        url: "https://langchain-ai.github.io/langgraph/",
    },
    Entry {
        key: "react agent",
        title: "ReAct: Synergizing Reasoning and Acting in Language Models",
        content: "ReAct (Reasoning + Acting) is a paradigm where LLMs interleave reasoning traces and actions. \
                  The agent thinks step-by-step (Thought), takes an action (Action), and observes the result (Observation). \
                  This loop continues until the task is complete.",
        url: "https://arxiv.org/abs/2210.03629",
    },
    Entry {
        key: "gemini api",
        title: "Google Gemini API Documentation",
        content: "Gemini is Google's most capable AI model family. The API provides access to Gemini 1.5 Pro, \
                  Gemini 1.5 Flash, and other models. Features include multimodal understanding, \
                  long context windows (up to 2M tokens), and function calling capabilities.",
        url: "https://ai.google.dev/docs",
    },
    Entry {
        key: "langchain",
        title: "LangChain - Build LLM Applications",
        content: "LangChain is a framework for developing applications powered by language models. \
                  It provides modules for prompts, models, memory, chains, agents, and tools. \
                  LangChain Expression Language (LCEL) enables easy composition of components.",
        url: "https://python.langchain.com/",
    },
    Entry {
        key: "python",
        title: "Python Programming Language",
        content: "Python is a high-level, general-purpose programming language. \
                  Known for readability and extensive libraries. \
                  Widely used in AI/ML, web development, data science, and automation.",
        url: "https://www.python.org/",
    },
    Entry {
        key: "weather",
        title: "Current Weather Information",
        content: "Temperature varies by location. For accurate weather, please specify a city. \
                  Demo shows: New York - 45°F, London - 50°F, Tokyo - 55°F, Sydney - 75°F.",
        url: "https://weather.example.com/",
    },
];

pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information on a given topic. Returns results with a title, a content snippet, and the source URL."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_arguments("Missing 'query' argument"))?;

        let results = search(query);
        debug!(query, hits = results.len(), "Knowledge base search");
        let data = serde_json::to_value(&results)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(ToolOutput::text(render(query, &results)).with_data(data))
    }
}

/// Entries whose key, or any word of it, occurs in the query.
fn search(query: &str) -> Vec<&'static Entry> {
    let query = query.to_lowercase();
    KNOWLEDGE_BASE
        .iter()
        .filter(|entry| {
            query.contains(entry.key) || entry.key.split(' ').any(|word| query.contains(word))
        })
        .collect()
}

fn render(query: &str, results: &[&Entry]) -> String {
    if results.is_empty() {
        return format!(
            "Search results for '{query}':\n\
             No specific results found in the knowledge base.\n\
             Tip: Try searching for 'LangGraph', 'ReAct agent', 'Gemini API', or 'Python'."
        );
    }

    let mut output = format!("Search results for '{query}':\n\n");
    for (i, entry) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. **{}**\n   {}\n   Source: {}\n\n",
            i + 1,
            entry.title,
            entry.content,
            entry.url
        ));
    }
    output
}
