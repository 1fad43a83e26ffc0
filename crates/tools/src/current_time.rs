//! Current time tool: reports the local date and time.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolOutput};

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let now = Local::now();
        Ok(ToolOutput::text(describe(&now))
            .with_data(serde_json::json!({ "timestamp": now.to_rfc3339() })))
    }
}

/// e.g. "Current date and time: Sunday, October 18, 2026 at 09:05 AM"
fn describe<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Current date and time: {}",
        at.format("%A, %B %d, %Y at %I:%M %p")
    )
}
