//! Tool domain value objects: small enums and the parameter mapping binding

use serde::{Deserialize, Serialize};

/// Where a parameter's value is expected to come from.
///
/// Only [`UserInput`](Self::UserInput) and [`DependentTool`](Self::DependentTool)
/// carry planning semantics today: every other source is treated like user
/// input, i.e. satisfied only when provided explicitly or defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterSource {
    #[default]
    UserInput,
    SystemProvided,
    DependentTool,
    DefaultValue,
    ContextVariable,
    ApiResponse,
    Computed,
}

impl ParameterSource {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterSource::UserInput => "USER_INPUT",
            ParameterSource::SystemProvided => "SYSTEM_PROVIDED",
            ParameterSource::DependentTool => "DEPENDENT_TOOL",
            ParameterSource::DefaultValue => "DEFAULT_VALUE",
            ParameterSource::ContextVariable => "CONTEXT_VARIABLE",
            ParameterSource::ApiResponse => "API_RESPONSE",
            ParameterSource::Computed => "COMPUTED",
        }
    }
}

impl std::fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strength of a dependency edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    /// Must be honored when computing the minimal dependency closure
    #[default]
    Required,
    /// Orders execution when both tools are planned, but never pulls a tool in
    Optional,
}

impl DependencyType {
    pub fn as_str(&self) -> &str {
        match self {
            DependencyType::Required => "REQUIRED",
            DependencyType::Optional => "OPTIONAL",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, DependencyType::Required)
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binds a dependency tool's output parameter to a dependent tool's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMapping {
    /// Parameter name on the dependency tool
    #[serde(alias = "source_parameter")]
    pub source_parameter: String,
    /// Parameter name on the dependent tool
    #[serde(alias = "target_parameter")]
    pub target_parameter: String,
}

impl ParameterMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_parameter: source.into(),
            target_parameter: target.into(),
        }
    }
}
