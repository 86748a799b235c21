//! Dependency validator
//!
//! Write-time checks that keep the stored dependency set acyclic and its
//! parameter mappings well-formed. Callers run these inside their write
//! transaction; a failure aborts the write before anything is persisted.

use crate::ports::tool_repository::ToolRepository;
use std::sync::Arc;
use toolgraph_domain::{DomainError, MappingSide, ParameterMapping, Tool, ToolGraph, ToolId};
use tracing::debug;

pub struct DependencyValidator {
    repository: Arc<dyn ToolRepository>,
}

impl DependencyValidator {
    pub fn new(repository: Arc<dyn ToolRepository>) -> Self {
        Self { repository }
    }

    /// Reject `proposed` as the new dependency set of `tool_id` if it would
    /// close a cycle.
    ///
    /// The check runs over every stored edge in the system, active or not,
    /// except the ones `tool_id` currently owns (they are being replaced).
    pub fn validate_no_cycles(&self, tool_id: &ToolId, proposed: &[ToolId]) -> Result<(), DomainError> {
        for dependency in proposed {
            if dependency != tool_id && !self.repository.tool_exists(dependency)? {
                return Err(DomainError::DependencyToolNotFound(dependency.clone()));
            }
        }

        let mut graph = ToolGraph::new();
        for edge in self.repository.load_all_dependency_edges()? {
            if &edge.tool == tool_id {
                continue;
            }
            graph.add_edge(edge.dependency_tool, edge.tool);
        }
        graph.add_node(tool_id.clone());
        for dependency in proposed {
            graph.add_edge(dependency.clone(), tool_id.clone());
        }

        if !graph.has_cycles() {
            debug!(tool = %tool_id, dependencies = proposed.len(), "No cycle in proposed dependencies");
            return Ok(());
        }

        // Prefer a cycle through the tool being written: tool -> ... -> dependency -> tool
        let through_tool = proposed
            .iter()
            .map(|dependency| graph.shortest_path(tool_id, dependency))
            .find(|path| !path.is_empty());
        let tool_ids = through_tool
            .or_else(|| graph.find_cycle())
            .unwrap_or_else(|| vec![tool_id.clone()]);

        Err(DomainError::CyclicDependency { tool_ids })
    }

    /// Check `mappings` on the stored edge `dependency_tool_id -> tool_id`.
    pub fn validate_parameter_mappings(
        &self,
        tool_id: &ToolId,
        dependency_tool_id: &ToolId,
        mappings: &[ParameterMapping],
    ) -> Result<(), DomainError> {
        let tool = self
            .repository
            .find_tool(tool_id)?
            .ok_or_else(|| DomainError::ToolNotFound(tool_id.clone()))?;
        let dependency = self
            .repository
            .find_tool(dependency_tool_id)?
            .ok_or_else(|| DomainError::DependencyToolNotFound(dependency_tool_id.clone()))?;

        check_mappings(&tool, &dependency, mappings)
    }

    /// Every write-time check for a tool about to be persisted: unique
    /// parameter names, no cycles, and valid mappings on each dependency.
    ///
    /// `tool` does not need to exist yet; its own parameters are taken from
    /// the argument rather than from storage.
    pub fn validate_tool(&self, tool: &Tool) -> Result<(), DomainError> {
        tool.validate_parameter_names()?;

        let proposed: Vec<ToolId> = tool.dependency_ids().cloned().collect();
        self.validate_no_cycles(&tool.id, &proposed)?;

        for dependency in &tool.dependencies {
            if dependency.dependency_tool == tool.id {
                check_mappings(tool, tool, &dependency.parameter_mappings)?;
                continue;
            }
            let dependency_tool = self
                .repository
                .find_tool(&dependency.dependency_tool)?
                .ok_or_else(|| DomainError::DependencyToolNotFound(dependency.dependency_tool.clone()))?;
            check_mappings(tool, &dependency_tool, &dependency.parameter_mappings)?;
        }

        Ok(())
    }
}

fn check_mappings(tool: &Tool, dependency: &Tool, mappings: &[ParameterMapping]) -> Result<(), DomainError> {
    for mapping in mappings {
        let missing = if !dependency.has_parameter(&mapping.source_parameter) {
            Some((&mapping.source_parameter, MappingSide::Source))
        } else if !tool.has_parameter(&mapping.target_parameter) {
            Some((&mapping.target_parameter, MappingSide::Target))
        } else {
            None
        };

        if let Some((parameter, side)) = missing {
            return Err(DomainError::InvalidParameterMapping {
                tool_id: tool.id.clone(),
                dependency_tool_id: dependency.id.clone(),
                parameter: parameter.clone(),
                side,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FakeRepository, chain, ids};
    use toolgraph_domain::{ToolDependency, ToolParameter};

    fn validator(tools: Vec<Tool>) -> DependencyValidator {
        DependencyValidator::new(Arc::new(FakeRepository::with_tools(tools)))
    }

    #[test]
    fn test_acyclic_proposal_passes() {
        let validator = validator(chain());
        validator
            .validate_no_cycles(&"d".into(), &ids(&["c", "a"]))
            .unwrap();
    }

    #[test]
    fn test_two_tool_cycle_rejected() {
        // b already depends on a; making a depend on b closes the loop
        let validator = validator(vec![
            Tool::new("a", "A"),
            Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
        ]);

        let err = validator
            .validate_no_cycles(&"a".into(), &ids(&["b"]))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::CyclicDependency {
                tool_ids: ids(&["a", "b"])
            }
        );
    }

    #[test]
    fn test_long_cycle_reported_through_tool() {
        let validator = validator(chain());
        let err = validator
            .validate_no_cycles(&"a".into(), &ids(&["c"]))
            .unwrap_err();
        assert_eq!(err.tool_ids(), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_existing_edges_of_tool_are_replaced() {
        // c currently depends on b; replacing that with a dependency on a is fine
        let validator = validator(chain());
        validator
            .validate_no_cycles(&"c".into(), &ids(&["a"]))
            .unwrap();
        // b dropping its edge to a lets a depend on b
        validator
            .validate_no_cycles(&"b".into(), &[])
            .unwrap();
    }

    #[test]
    fn test_edges_of_inactive_tools_still_count() {
        let validator = validator(vec![
            Tool::new("a", "A"),
            Tool::new("b", "B")
                .with_dependency(ToolDependency::required("a"))
                .inactive(),
        ]);
        let err = validator
            .validate_no_cycles(&"a".into(), &ids(&["b"]))
            .unwrap_err();
        assert!(matches!(err, DomainError::CyclicDependency { .. }));
    }

    #[test]
    fn test_self_dependency_rejected() {
        let validator = validator(chain());
        let err = validator
            .validate_no_cycles(&"a".into(), &ids(&["a"]))
            .unwrap_err();
        assert_eq!(err.tool_ids(), ids(&["a"]));
    }

    #[test]
    fn test_unknown_dependency_tool() {
        let validator = validator(chain());
        let err = validator
            .validate_no_cycles(&"c".into(), &ids(&["ghost"]))
            .unwrap_err();
        assert_eq!(err, DomainError::DependencyToolNotFound("ghost".into()));
    }

    fn mapped_tools() -> Vec<Tool> {
        vec![
            Tool::new("z", "Z").with_parameter(ToolParameter::optional("out1")),
            Tool::new("y", "Y")
                .with_parameter(ToolParameter::required("p1"))
                .with_dependency(ToolDependency::required("z").with_mapping("out1", "p1")),
        ]
    }

    #[test]
    fn test_mappings_resolve_on_both_sides() {
        let validator = validator(mapped_tools());
        validator
            .validate_parameter_mappings(
                &"y".into(),
                &"z".into(),
                &[ParameterMapping::new("out1", "p1")],
            )
            .unwrap();
    }

    #[test]
    fn test_mapping_with_unknown_source_names_parameter() {
        let validator = validator(mapped_tools());
        let err = validator
            .validate_parameter_mappings(
                &"y".into(),
                &"z".into(),
                &[ParameterMapping::new("nope", "p1")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidParameterMapping { ref parameter, side: MappingSide::Source, .. }
                if parameter == "nope"
        ));
    }

    #[test]
    fn test_mapping_with_unknown_target_names_parameter() {
        let validator = validator(mapped_tools());
        let err = validator
            .validate_parameter_mappings(
                &"y".into(),
                &"z".into(),
                &[ParameterMapping::new("out1", "p9")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidParameterMapping { ref parameter, side: MappingSide::Target, .. }
                if parameter == "p9"
        ));
    }

    #[test]
    fn test_mapping_on_missing_tools() {
        let validator = validator(mapped_tools());
        let err = validator
            .validate_parameter_mappings(&"y".into(), &"ghost".into(), &[])
            .unwrap_err();
        assert_eq!(err, DomainError::DependencyToolNotFound("ghost".into()));
    }

    #[test]
    fn test_validate_tool_uses_candidate_parameters() {
        let validator = validator(mapped_tools());

        let candidate = Tool::new("w", "W")
            .with_parameter(ToolParameter::required("input"))
            .with_dependency(ToolDependency::required("z").with_mapping("out1", "input"));
        validator.validate_tool(&candidate).unwrap();

        let broken = Tool::new("w", "W")
            .with_dependency(ToolDependency::required("z").with_mapping("out1", "input"));
        assert!(matches!(
            validator.validate_tool(&broken),
            Err(DomainError::InvalidParameterMapping { .. })
        ));

        let duplicate = Tool::new("w", "W")
            .with_parameter(ToolParameter::required("p"))
            .with_parameter(ToolParameter::optional("p"));
        assert!(matches!(
            validator.validate_tool(&duplicate),
            Err(DomainError::DuplicateParameterName { .. })
        ));
    }
}
