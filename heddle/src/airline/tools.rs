//! Airline tool specifications, embedded as YAML.
//!
//! Each tool has one file under `heddle/tools/*.yaml`, embedded at compile
//! time via `include_str!` and parsed when the list is built. Execution
//! is supplied by the embedding harness (or [`SampleAirlineToolSource`] for
//! demos); these specs are what the LLM sees. Add a new line to
//! `TOOL_YAML_FILES` when adding a tool YAML.
//!
//! [`SampleAirlineToolSource`]: super::SampleAirlineToolSource

use thiserror::Error;

use crate::tool_source::ToolSpec;

pub const TOOL_GET_USER_DETAILS: &str = "get_user_details";
pub const TOOL_GET_RESERVATION_DETAILS: &str = "get_reservation_details";
pub const TOOL_SEARCH_DIRECT_FLIGHT: &str = "search_direct_flight";
pub const TOOL_SEARCH_ONESTOP_FLIGHT: &str = "search_onestop_flight";
pub const TOOL_LIST_ALL_AIRPORTS: &str = "list_all_airports";
pub const TOOL_CALCULATE: &str = "calculate";
pub const TOOL_UPDATE_RESERVATION_FLIGHTS: &str = "update_reservation_flights";

/// Builds a static list of embedded YAML file contents. One entry per tool;
/// paths relative to this source file (heddle/src/airline/).
macro_rules! embed_tool_yaml {
    ($($path:literal),+ $(,)?) => {
        &[ $( include_str!($path) ),+ ]
    };
}

const TOOL_YAML_FILES: &[&str] = embed_tool_yaml!(
    "../../tools/get_user_details.yaml",
    "../../tools/get_reservation_details.yaml",
    "../../tools/search_direct_flight.yaml",
    "../../tools/search_onestop_flight.yaml",
    "../../tools/list_all_airports.yaml",
    "../../tools/calculate.yaml",
    "../../tools/update_reservation_flights.yaml",
);

/// Errors from loading the embedded tool YAML specs.
#[derive(Debug, Error)]
pub enum AirlineSpecError {
    #[error("failed to parse tool YAML ({name}): {message}")]
    Parse { name: String, message: String },
}

/// Loads the airline tool specs from the embedded YAML files (one spec per file).
pub fn airline_tool_specs() -> Result<Vec<ToolSpec>, AirlineSpecError> {
    let mut specs = Vec::with_capacity(TOOL_YAML_FILES.len());
    for (i, yaml_str) in TOOL_YAML_FILES.iter().enumerate() {
        let spec: ToolSpec =
            serde_yaml::from_str(yaml_str).map_err(|e| AirlineSpecError::Parse {
                name: format!("file_{}", i),
                message: e.to_string(),
            })?;
        specs.push(spec);
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Embedded YAML files parse and cover the workflow's tool set.
    #[test]
    fn airline_tool_specs_cover_workflow_tools() {
        let specs = airline_tool_specs().expect("tools/*.yaml must parse");
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        for expected in [
            TOOL_GET_USER_DETAILS,
            TOOL_GET_RESERVATION_DETAILS,
            TOOL_SEARCH_DIRECT_FLIGHT,
            TOOL_SEARCH_ONESTOP_FLIGHT,
            TOOL_LIST_ALL_AIRPORTS,
            TOOL_CALCULATE,
            TOOL_UPDATE_RESERVATION_FLIGHTS,
        ] {
            assert!(names.contains(&expected), "expected {} in {:?}", expected, names);
        }
    }

    /// **Scenario**: every spec carries an object schema for its arguments.
    #[test]
    fn airline_tool_specs_have_object_schemas() {
        for spec in airline_tool_specs().unwrap() {
            assert_eq!(
                spec.input_schema["type"], "object",
                "{} should take an object",
                spec.name
            );
            assert!(spec.description.is_some(), "{} needs a description", spec.name);
        }
    }
}
