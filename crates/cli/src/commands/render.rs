//! Terminal rendering of banners and step events.

use reactloop_agent::StepEvent;
use reactloop_core::message::{Message, ToolRequest};

const RULE_WIDTH: usize = 60;
const OBSERVATION_PREVIEW: usize = 100;

pub fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Boxed title banner.
pub fn banner(title: &str) -> String {
    let subtitle = "Reason + Act, with tools";
    let width = RULE_WIDTH.max(title.chars().count() + 10);
    let line = |text: &str| {
        let len = text.chars().count();
        let left = (width - len) / 2;
        let right = width - len - left;
        format!("║{}{text}{}║", " ".repeat(left), " ".repeat(right))
    };
    format!(
        "\n╔{border}╗\n{}\n{}\n╚{border}╝\n",
        line(title),
        line(subtitle),
        border = "═".repeat(width)
    )
}

/// Print one step event under a numbered header.
pub fn print_step(event: &StepEvent, step: usize) {
    println!("\n{}", rule('='));
    println!("📌 Step {step}");
    println!("{}", rule('='));
    for line in step_lines(event) {
        println!("   {line}");
    }
}

/// The body lines shown for one step event.
pub fn step_lines(event: &StepEvent) -> Vec<String> {
    match event {
        StepEvent::Reasoning {
            iteration,
            text,
            tool_requests,
        } => {
            let mut lines = vec![format!("🔹 Reasoning (iteration {iteration})")];
            let content = if text.trim().is_empty() {
                "[Tool Call]"
            } else {
                text.trim()
            };
            lines.push(format!("🤖 Agent: {content}"));
            if !tool_requests.is_empty() {
                let calls: Vec<String> = tool_requests.iter().map(format_request).collect();
                lines.push(format!("🔧 Tools: {}", calls.join(", ")));
            }
            lines
        }
        StepEvent::ToolResults { results, .. } => {
            let mut lines = vec!["🔹 Tools".to_string()];
            lines.extend(results.iter().filter_map(format_result));
            lines
        }
        StepEvent::Done {
            answer, iterations, ..
        } => {
            let status = if answer.is_complete() {
                "answered"
            } else {
                "stopped at the iteration limit"
            };
            vec![format!("🏁 Done ({status} after {iterations} reasoning step(s))")]
        }
    }
}

fn format_request(request: &ToolRequest) -> String {
    format!("{}({})", request.name, request.arguments)
}

fn format_result(message: &Message) -> Option<String> {
    let Message::ToolResult {
        tool_name, outcome, ..
    } = message
    else {
        return None;
    };
    let observation = outcome.observation().replace('\n', " ");
    let icon = if outcome.is_success() { "⚙️ " } else { "⚠️ " };
    Some(format!(
        "{icon} Tool ({tool_name}): {}",
        truncate(&observation, OBSERVATION_PREVIEW)
    ))
}

/// Cut `text` to at most `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}
