//! devgraph - resource topology for DevBox platform workspaces
//!
//! Discovers the Kubernetes objects belonging to a root resource, infers
//! the connections between them, and prints inventories, edge data, or a
//! laid-out node graph.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use devgraph::cli::init_logging;
use devgraph::config::ConfigLoader;
use devgraph::discovery::RootKind;
use devgraph::layout::Direction;
use devgraph::services::GraphService;

/// Resource topology for DevBox platform workspaces
#[derive(Parser, Debug)]
#[command(name = "devgraph")]
#[command(about = "Discover, connect and lay out the resources of a workspace", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Namespace to discover in (defaults to the configured namespace)
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "json")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the laid-out node graph for a root resource
    Graph {
        /// Root kind: instance (project), devbox, cluster, deployment, statefulset
        root: RootKind,
        /// Root resource name
        name: String,
        /// Layout direction (overrides the configured one)
        #[arg(long)]
        direction: Option<Direction>,
        /// Skip the annotation summary cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the flat resource inventory for a root resource
    Inventory {
        root: RootKind,
        name: String,
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the inferred connection graph for a root resource
    Connections {
        root: RootKind,
        name: String,
        #[arg(long)]
        no_cache: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::load();
    init_logging(args.debug, &config.logger.level);

    let namespace = args
        .namespace
        .clone()
        .unwrap_or_else(|| config.default_namespace.clone());

    let client = devgraph::kube::create_client().await?;
    let build_service = |no_cache: bool| {
        let service = GraphService::new(client.clone(), namespace.clone());
        if no_cache || !config.discovery.use_cache {
            service.without_cache()
        } else {
            service
        }
    };

    match args.command {
        Command::Graph {
            root,
            name,
            direction,
            no_cache,
        } => {
            let service = build_service(no_cache);
            let graph = service.discover(root, &name).await?;
            let connections = service.connections(&graph).await;
            let mut options = config.layout.to_options();
            if let Some(direction) = direction {
                options.direction = direction;
            }
            let nodes = service.flow_graph(&graph, &connections, &options);
            print_output(&nodes, args.output)?;
        }
        Command::Inventory {
            root,
            name,
            no_cache,
        } => {
            let service = build_service(no_cache);
            let graph = service.discover(root, &name).await?;
            print_output(&graph.inventory(), args.output)?;
        }
        Command::Connections {
            root,
            name,
            no_cache,
        } => {
            let service = build_service(no_cache);
            let graph = service.discover(root, &name).await?;
            let connections = service.connections(&graph).await;
            print_output(&connections, args.output)?;
        }
    }

    Ok(())
}
