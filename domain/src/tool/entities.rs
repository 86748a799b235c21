//! Tool domain entities

use super::value_objects::{DependencyType, ParameterMapping, ParameterSource};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a registered tool.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ToolId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ToolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered, independently invocable capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    /// Unique across the registry
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    #[serde(default)]
    pub dependencies: Vec<ToolDependency>,
}

fn default_active() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

impl Tool {
    pub fn new(id: impl Into<ToolId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            active: true,
            version: 1,
            parameters: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add a dependency; its owning tool is set to this tool.
    pub fn with_dependency(mut self, mut dependency: ToolDependency) -> Self {
        dependency.tool = self.id.clone();
        self.dependencies.push(dependency);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Point every dependency's `tool` back at this tool.
    ///
    /// Catalog files omit the owning tool inside nested dependency tables.
    pub fn normalized(mut self) -> Self {
        for dependency in &mut self.dependencies {
            dependency.tool = self.id.clone();
        }
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn dependency_on(&self, dependency_tool: &ToolId) -> Option<&ToolDependency> {
        self.dependencies
            .iter()
            .find(|d| &d.dependency_tool == dependency_tool)
    }

    pub fn dependency_ids(&self) -> impl Iterator<Item = &ToolId> {
        self.dependencies.iter().map(|d| &d.dependency_tool)
    }

    /// Parameter names must be unique within a tool.
    pub fn validate_parameter_names(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(DomainError::DuplicateParameterName {
                    tool_id: self.id.clone(),
                    parameter: parameter.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Named input (or output) of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Unique within the owning tool
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Type hint (e.g., "string", "number", "date")
    #[serde(default = "default_param_type", rename = "type")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub source: ParameterSource,
    /// Lower values are asked for first
    #[serde(default)]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

fn default_param_type() -> String {
    "string".to_string()
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required,
            param_type: default_param_type(),
            default_value: None,
            source: ParameterSource::default(),
            priority: 0,
            examples: Vec::new(),
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_source(mut self, source: ParameterSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// A default counts only when it carries a value: `null` and `""` do not.
    pub fn has_default(&self) -> bool {
        match &self.default_value {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// "`tool` cannot safely run before `dependency_tool`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDependency {
    /// Owning (dependent) tool
    #[serde(default)]
    pub tool: ToolId,
    pub dependency_tool: ToolId,
    #[serde(default, rename = "type")]
    pub dependency_type: DependencyType,
    #[serde(default, alias = "mappings")]
    pub parameter_mappings: Vec<ParameterMapping>,
}

impl ToolDependency {
    pub fn new(
        tool: impl Into<ToolId>,
        dependency_tool: impl Into<ToolId>,
        dependency_type: DependencyType,
    ) -> Self {
        Self {
            tool: tool.into(),
            dependency_tool: dependency_tool.into(),
            dependency_type,
            parameter_mappings: Vec::new(),
        }
    }

    /// A required dependency whose owner is filled in by [`Tool::with_dependency`].
    pub fn required(dependency_tool: impl Into<ToolId>) -> Self {
        Self::new(ToolId::default(), dependency_tool, DependencyType::Required)
    }

    /// An optional dependency whose owner is filled in by [`Tool::with_dependency`].
    pub fn optional(dependency_tool: impl Into<ToolId>) -> Self {
        Self::new(ToolId::default(), dependency_tool, DependencyType::Optional)
    }

    pub fn with_mapping(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.parameter_mappings
            .push(ParameterMapping::new(source, target));
        self
    }

    pub fn is_required(&self) -> bool {
        self.dependency_type.is_required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_id_display_and_debug() {
        let id = ToolId::from("weather");
        assert_eq!(id.to_string(), "weather");
        assert_eq!(format!("{:?}", id), "\"weather\"");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"weather\"");
    }

    #[test]
    fn test_with_dependency_sets_owner() {
        let tool = Tool::new("forecast", "Forecast")
            .with_dependency(ToolDependency::required("geocode").with_mapping("lat", "latitude"));

        let dep = tool.dependency_on(&ToolId::from("geocode")).unwrap();
        assert_eq!(dep.tool, ToolId::from("forecast"));
        assert!(dep.is_required());
        assert_eq!(dep.parameter_mappings[0].target_parameter, "latitude");
        assert!(tool.dependency_on(&ToolId::from("other")).is_none());
    }

    #[test]
    fn test_normalized_fills_owner() {
        let mut tool = Tool::new("b", "B");
        tool.dependencies.push(ToolDependency::optional("a"));
        let tool = tool.normalized();
        assert_eq!(tool.dependencies[0].tool, ToolId::from("b"));
    }

    #[test]
    fn test_duplicate_parameter_names_rejected() {
        let tool = Tool::new("x", "X")
            .with_parameter(ToolParameter::required("p1"))
            .with_parameter(ToolParameter::optional("p1"));

        let err = tool.validate_parameter_names().unwrap_err();
        assert!(matches!(
            err,
            DomainError::DuplicateParameterName { ref parameter, .. } if parameter == "p1"
        ));
    }

    #[test]
    fn test_has_default() {
        assert!(!ToolParameter::required("a").has_default());
        assert!(!ToolParameter::required("a").with_default("").has_default());
        assert!(!ToolParameter::required("a").with_default(serde_json::Value::Null).has_default());
        assert!(ToolParameter::required("a").with_default("metric").has_default());
        assert!(ToolParameter::required("a").with_default(0).has_default());
    }

    #[test]
    fn test_required_parameters() {
        let tool = Tool::new("x", "X")
            .with_parameter(ToolParameter::required("a"))
            .with_parameter(ToolParameter::optional("b"))
            .with_parameter(ToolParameter::required("c"));

        let names: Vec<_> = tool.required_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(tool.has_parameter("b"));
        assert!(!tool.has_parameter("z"));
    }

    #[test]
    fn test_tool_deserializes_with_defaults() {
        let tool: Tool = serde_json::from_str(
            r#"{
                "id": "t1",
                "name": "Tool One",
                "parameters": [{"name": "q", "required": true}],
                "dependencies": [{"dependency_tool": "t0", "type": "OPTIONAL"}]
            }"#,
        )
        .unwrap();

        assert!(tool.active);
        assert_eq!(tool.version, 1);
        assert_eq!(tool.parameters[0].param_type, "string");
        assert_eq!(tool.parameters[0].source, ParameterSource::UserInput);
        assert_eq!(tool.dependencies[0].dependency_type, DependencyType::Optional);
    }
}
