//! Built-in tool implementations for reactloop.
//!
//! Tools give the agent the ability to do math, search a (simulated) web,
//! tell the time, and check the (simulated) weather.

pub mod arithmetic;
pub mod calculator;
pub mod current_time;
pub mod weather_lookup;
pub mod web_search;

use reactloop_core::error::ToolError;
use reactloop_core::tool::{Tool, ToolRegistry};

/// Names of every built-in tool, in registration order.
pub const BUILTIN_TOOLS: &[&str] = &[
    "calculator",
    "add",
    "multiply",
    "web_search",
    "get_current_time",
    "get_weather",
];

/// Create a registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    registry_with(BUILTIN_TOOLS).expect("BUILTIN_TOOLS names are distinct and all resolve")
}

/// Create a registry holding only the named built-in tools, in the given order.
pub fn registry_with<S: AsRef<str>>(names: &[S]) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    for name in names {
        let name = name.as_ref();
        let tool = builtin(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;
        registry.register(tool)?;
    }
    Ok(registry)
}

/// Instantiate a built-in tool by name.
pub fn builtin(name: &str) -> Option<Box<dyn Tool>> {
    let tool: Box<dyn Tool> = match name {
        "calculator" => Box::new(calculator::CalculatorTool),
        "add" => Box::new(arithmetic::AddTool),
        "multiply" => Box::new(arithmetic::MultiplyTool),
        "web_search" => Box::new(web_search::WebSearchTool),
        "get_current_time" => Box::new(current_time::CurrentTimeTool),
        "get_weather" => Box::new(weather_lookup::WeatherLookupTool),
        _ => return None,
    };
    Some(tool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_every_builtin() {
        let registry = default_registry();
        assert_eq!(registry.names(), BUILTIN_TOOLS.to_vec());
    }

    #[test]
    fn builtin_names_are_distinct_and_resolve() {
        let mut seen = std::collections::HashSet::new();
        for name in BUILTIN_TOOLS {
            assert!(seen.insert(name), "{name} listed twice");
            assert_eq!(builtin(name).map(|t| t.name().to_string()).as_deref(), Some(*name));
        }
    }

    #[test]
    fn registry_with_subset() {
        let registry = registry_with(&["multiply", "add"]).unwrap();
        assert_eq!(registry.names(), vec!["multiply", "add"]);
    }

    #[test]
    fn registry_with_unknown_name_fails() {
        let err = registry_with(&["teleport"]).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { .. }));
    }

    #[test]
    fn registry_with_duplicate_fails() {
        let err = registry_with(&["add", "add"]).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool { .. }));
    }

    #[test]
    fn every_builtin_schema_is_an_object() {
        for def in default_registry().definitions() {
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }
}
