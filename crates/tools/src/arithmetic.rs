//! Two-operand arithmetic tools: `add` and `multiply`.
//!
//! Cheaper for the model to call than `calculator` when the operation is a
//! single sum or product.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolOutput};

use crate::calculator::format_number;

fn operands_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "a": { "type": "number", "description": "First number" },
            "b": { "type": "number", "description": "Second number" }
        },
        "required": ["a", "b"]
    })
}

fn operands(arguments: &serde_json::Value) -> Result<(f64, f64), ToolError> {
    let a = arguments["a"]
        .as_f64()
        .ok_or_else(|| ToolError::invalid_arguments("Missing numeric 'a' argument"))?;
    let b = arguments["b"]
        .as_f64()
        .ok_or_else(|| ToolError::invalid_arguments("Missing numeric 'b' argument"))?;
    Ok((a, b))
}

fn result(value: f64) -> Result<ToolOutput, ToolError> {
    if !value.is_finite() {
        return Err(ToolError::execution_failed("Result is not a finite number"));
    }
    Ok(ToolOutput::text(format!("Result: {}", format_number(value)))
        .with_data(serde_json::json!({ "result": value })))
}

pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two numbers together."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        operands_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let (a, b) = operands(&arguments)?;
        result(a + b)
    }
}

pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two numbers together."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        operands_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let (a, b) = operands(&arguments)?;
        result(a * b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_numbers() {
        let out = AddTool
            .execute(serde_json::json!({"a": 100, "b": 50}))
            .await
            .unwrap();
        assert_eq!(out.content, "Result: 150");
    }

    #[tokio::test]
    async fn multiply_numbers() {
        let out = MultiplyTool
            .execute(serde_json::json!({"a": 25, "b": 4}))
            .await
            .unwrap();
        assert_eq!(out.content, "Result: 100");

        let out = MultiplyTool
            .execute(serde_json::json!({"a": 5, "b": 1.5}))
            .await
            .unwrap();
        assert_eq!(out.content, "Result: 7.5");
    }

    #[tokio::test]
    async fn overflow_is_an_execution_failure() {
        let err = MultiplyTool
            .execute(serde_json::json!({"a": 1e308, "b": 1e308}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn non_numeric_operand_rejected() {
        let err = AddTool
            .execute(serde_json::json!({"a": "one", "b": 2}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
