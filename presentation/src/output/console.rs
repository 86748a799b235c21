//! Console output formatter for plans and graph reports

use colored::Colorize;
use serde::Serialize;
use toolgraph_domain::{DependencyType, ExecutionPlan, GraphSnapshot, ToolId};

/// Formats planner results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format an execution plan
    pub fn format_plan(plan: &ExecutionPlan) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Execution Plan"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Requested:".cyan().bold(),
            Self::join(&plan.requested_tools)
        ));

        if plan.is_empty() {
            output.push_str(&format!("\n{}\n", "Nothing to run.".dimmed()));
            output.push_str(&Self::footer());
            return output;
        }

        // Order
        output.push_str(&Self::section_header("Order"));
        for (i, tool) in plan.tools_in_order.iter().enumerate() {
            let marker = if plan.requested_tools.contains(tool) {
                "*".green().bold().to_string()
            } else {
                " ".to_string()
            };
            output.push_str(&format!("{:>3}. {} {}\n", i + 1, marker, tool));
            for flow in plan.mappings_for(tool) {
                output.push_str(&format!(
                    "        {} {}.{} -> {}\n",
                    "<-".dimmed(),
                    flow.source_tool,
                    flow.source_parameter,
                    flow.target_parameter
                ));
            }
        }

        // Parallel groups
        output.push_str(&Self::section_header("Parallel Groups"));
        for (i, group) in plan.parallel_execution_groups.iter().enumerate() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", i + 1).yellow(),
                Self::join(group)
            ));
        }

        // Missing parameters
        if plan.has_missing_required_parameters {
            output.push_str(&Self::section_header("Missing Parameters"));
            for (tool, requirements) in &plan.missing_parameters {
                output.push_str(&format!("\n{}\n", format!("── {} ──", tool).red().bold()));
                for requirement in requirements {
                    output.push_str(&format!(
                        "  * {} ({})",
                        requirement.name.bold(),
                        requirement.param_type
                    ));
                    if !requirement.description.is_empty() {
                        output.push_str(&format!(": {}", requirement.description));
                    }
                    output.push('\n');
                    if !requirement.examples.is_empty() {
                        output.push_str(&format!(
                            "      {} {}\n",
                            "e.g.".dimmed(),
                            requirement.examples.join(", ")
                        ));
                    }
                }
            }
            output.push_str(&format!(
                "\n{} {} parameter(s) still needed\n",
                "Status:".yellow().bold(),
                plan.total_missing()
            ));
        } else {
            output.push_str(&format!("\n{} ready to execute\n", "Status:".green().bold()));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a graph snapshot as an edge list
    pub fn format_snapshot(snapshot: &GraphSnapshot) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} tools, {} dependencies\n",
            "Graph:".cyan().bold(),
            snapshot.node_count(),
            snapshot.edge_count()
        ));

        for edge in &snapshot.edges {
            let kind = match edge.dependency_type {
                DependencyType::Required => edge.dependency_type.as_str().normal(),
                DependencyType::Optional => edge.dependency_type.as_str().dimmed(),
            };
            output.push_str(&format!("  {} -> {}  [{}]\n", edge.from, edge.to, kind));
        }

        let isolated: Vec<&ToolId> = snapshot
            .nodes
            .iter()
            .filter(|n| !snapshot.edges.iter().any(|e| &e.from == *n || &e.to == *n))
            .collect();
        if !isolated.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Standalone:".dimmed(),
                isolated
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        output
    }

    /// Format the cycle report
    pub fn format_cycles(cycles: &[Vec<ToolId>], groups: &[Vec<ToolId>]) -> String {
        if cycles.is_empty() {
            return format!("{}\n", "No dependency cycles.".green());
        }

        let mut output = format!(
            "{} {} cycle(s) in {} group(s)\n",
            "Cycles:".red().bold(),
            cycles.len(),
            groups.len()
        );
        for cycle in cycles {
            let mut ids: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            if let Some(first) = cycle.first() {
                ids.push(first.as_str());
            }
            output.push_str(&format!("  {}\n", ids.join(" -> ")));
        }
        for group in groups {
            output.push_str(&format!("{} {}\n", "Group:".yellow(), Self::join(group)));
        }
        output
    }

    /// Format a titled list of tools related to `tool`
    pub fn format_tool_list(title: &str, tool: &ToolId, related: &[ToolId]) -> String {
        let mut output = format!("{} {}\n", format!("{} {}:", title, tool).cyan().bold(), related.len());
        if related.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for id in related {
            output.push_str(&format!("  * {}\n", id));
        }
        output
    }

    /// Format a dependency path
    pub fn format_path(from: &ToolId, to: &ToolId, path: &[ToolId]) -> String {
        if path.is_empty() {
            return format!("{} {} does not lead to {}\n", "No path:".yellow(), from, to);
        }
        let hops: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
        format!("{} {}\n", "Path:".cyan().bold(), hops.join(" -> "))
    }

    /// Format as JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn join(ids: &[ToolId]) -> String {
        ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
