//! CLI entrypoint for toolgraph
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toolgraph_application::{
    DependencyAnalysisService, DependencyGraphService, EventPublisher, ExecutionPlanGenerator,
    GraphUpdateNotifier, NoEventPublisher, PlanRequest, PlanRequestHandler, PlannerConfig,
    ToolCatalogService, ToolRepository,
};
use toolgraph_domain::ToolId;
use toolgraph_infrastructure::{
    ConfigLoader, EventSinkKind, FileConfig, InMemoryTtlCache, InMemoryToolRepository,
    JsonlEventPublisher, LogEventPublisher, ToolCatalogFile,
};
use toolgraph_presentation::{Cli, Command, ConsoleFormatter};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Services wired over one repository
struct Services {
    repository: Arc<InMemoryToolRepository>,
    graphs: Arc<DependencyGraphService>,
    plans: Arc<ExecutionPlanGenerator>,
    catalog: ToolCatalogService,
    analysis: DependencyAnalysisService,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }

    if matches!(cli.command, Command::ShowConfig) {
        show_config(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    let _guard = init_logging(&cli, &config)?;
    info!("Starting toolgraph");

    let planner = config.to_planner_config();
    let publisher = build_publisher(&config)?;
    let services = build_services(&planner, &config, publisher);

    if let Some(path) = cli
        .catalog
        .clone()
        .or_else(|| config.catalog.path.as_ref().map(PathBuf::from))
    {
        load_catalog(&services, &path).await?;
    }

    match cli.command {
        Command::Plan { tools, params, json } => {
            let request = params
                .into_iter()
                .fold(PlanRequest::new(tools), |request, (key, value)| {
                    request.with_parameter(key, value)
                });
            let response = PlanRequestHandler::new(services.plans.clone()).handle(&request);

            if json {
                println!("{}", ConsoleFormatter::format_json(&response));
            }
            match (response.plan, response.error) {
                (Some(plan), _) => {
                    if !json {
                        print!("{}", ConsoleFormatter::format_plan(&plan));
                    }
                }
                (None, Some(failure)) => bail!("{} ({})", failure.message, failure.error_kind),
                (None, None) => bail!("Planner returned no result"),
            }
        }
        Command::Graph {
            required_only,
            json,
        } => {
            let mut snapshot = services.graphs.snapshot()?;
            if required_only {
                snapshot.edges.retain(|edge| edge.dependency_type.is_required());
            }
            if json {
                println!("{}", ConsoleFormatter::format_json(&snapshot));
            } else {
                print!("{}", ConsoleFormatter::format_snapshot(&snapshot));
            }
        }
        Command::Cycles => {
            let cycles = services.analysis.find_cycles()?;
            let groups = services.analysis.strongly_connected_groups()?;
            print!("{}", ConsoleFormatter::format_cycles(&cycles, &groups));
        }
        Command::Closure { tool, reverse } => {
            let tool = ToolId::from(tool);
            let (title, related) = if reverse {
                ("Dependents of", services.analysis.impact_of(&tool)?)
            } else {
                ("Dependencies of", services.analysis.all_dependencies(&tool)?)
            };
            print!("{}", ConsoleFormatter::format_tool_list(title, &tool, &related));
        }
        Command::Impact { tool } => {
            let tool = ToolId::from(tool);
            let direct = services.analysis.direct_dependents(&tool)?;
            let affected = services.analysis.impact_of(&tool)?;
            print!("{}", ConsoleFormatter::format_tool_list("Direct dependents of", &tool, &direct));
            print!("{}", ConsoleFormatter::format_tool_list("Impact of", &tool, &affected));
        }
        Command::Path { from, to } => {
            let (from, to) = (ToolId::from(from), ToolId::from(to));
            let path = services.analysis.dependency_path(&from, &to)?;
            print!("{}", ConsoleFormatter::format_path(&from, &to, &path));
        }
        Command::Validate => {
            let graph = services.graphs.build_dependency_graph(false)?;
            let cycles = services.analysis.find_cycles()?;
            let inactive = services.repository.len() - services.repository.load_active_tools()?.len();
            if !cli.quiet {
                println!(
                    "Catalog OK: {} tools ({} inactive), {} dependencies",
                    services.repository.len(),
                    inactive,
                    graph.edge_count()
                );
            }
            if !cycles.is_empty() {
                bail!("{} dependency cycle(s) found", cycles.len());
            }
        }
        // Handled before configuration is loaded
        Command::ShowConfig => {}
    }

    Ok(())
}

/// Initialize logging from the verbosity level; `RUST_LOG` wins when set.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace", // -vvv or more
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match &config.logging.file {
        Some(file) => {
            let path = Path::new(file);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", file))?;
            if let Some(dir) = directory {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let appender = tracing_appender::rolling::never(directory.unwrap_or(Path::new(".")), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_publisher(config: &FileConfig) -> Result<Arc<dyn EventPublisher>> {
    let publisher: Arc<dyn EventPublisher> = match config.events.sink {
        EventSinkKind::Log => Arc::new(LogEventPublisher),
        EventSinkKind::Jsonl => {
            // validate() guarantees a path for the jsonl sink
            let path = config
                .events
                .jsonl_path
                .as_deref()
                .context("events.jsonl_path is required for the jsonl sink")?;
            Arc::new(
                JsonlEventPublisher::new(path)
                    .with_context(|| format!("Failed to open event log {}", path))?,
            )
        }
        EventSinkKind::None => Arc::new(NoEventPublisher),
    };
    Ok(publisher)
}

fn build_services(
    planner: &PlannerConfig,
    config: &FileConfig,
    publisher: Arc<dyn EventPublisher>,
) -> Services {
    let repository = Arc::new(InMemoryToolRepository::new());
    let store: Arc<dyn ToolRepository> = repository.clone();

    // One graph per dependency mode, so two entries suffice
    let graphs = Arc::new(DependencyGraphService::new(
        store.clone(),
        Arc::new(InMemoryTtlCache::new(2)),
        planner,
    ));
    let plans = Arc::new(ExecutionPlanGenerator::new(
        graphs.clone(),
        store.clone(),
        Arc::new(InMemoryTtlCache::new(config.cache.max_plan_entries)),
        planner.clone(),
    ));
    let notifier = Arc::new(GraphUpdateNotifier::new(
        graphs.clone(),
        plans.clone(),
        publisher,
        planner.graph_topic.clone(),
    ));

    Services {
        repository,
        catalog: ToolCatalogService::new(store.clone(), notifier),
        analysis: DependencyAnalysisService::new(graphs.clone(), store, planner.max_cycles),
        graphs,
        plans,
    }
}

async fn load_catalog(services: &Services, path: &Path) -> Result<()> {
    let tools = ToolCatalogFile::read(path)?;
    if tools.is_empty() {
        warn!(path = %path.display(), "Tool catalog is empty");
    }
    let imported = services
        .catalog
        .import_tools(tools)
        .await
        .with_context(|| format!("Invalid tool catalog {}", path.display()))?;
    info!(path = %path.display(), tools = imported.len(), "Tool catalog loaded");
    Ok(())
}

fn show_config(explicit: Option<&Path>) {
    println!("Configuration sources (highest priority first):");
    println!("  Environment: {}*", toolgraph_infrastructure::config::ENV_PREFIX);
    for (label, path) in ConfigLoader::config_sources(explicit) {
        match path {
            Some(path) => println!("  {}: {}", label, path.display()),
            None => println!("  {}: (not found)", label),
        }
    }
}
