//! kntopo - topology graphs and health summaries for Knative resources
//!
//! Reads objects through the Kubernetes API and prints the family around a
//! Service, Configuration, Revision or Route.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kntopo::cli::{self, ConfigSubcommand};
use kntopo::config::{Config, ConfigLoader, OutputFormat};
use kntopo::kube::{self, KubeObjectClient};
use kntopo::links::{LinkResolver, OverviewPathResolver};
use kntopo::status::READY;
use kntopo::RenderContext;
use std::sync::Arc;

/// Topology graphs and condition-based health for Knative resources
#[derive(Parser, Debug)]
#[command(name = "kntopo", version)]
#[command(about = "Topology graphs and condition-based health for Knative resources", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Show the topology graph around an object
    Graph {
        /// Kind (e.g. ksvc, Revision, PingSource.sources.knative.dev/v1)
        kind: String,
        /// Object name
        name: String,
        /// Namespace
        #[arg(long, short = 'n')]
        namespace: Option<String>,
        /// Output format: tree, json, yaml
        #[arg(long, short = 'o')]
        output: Option<OutputFormat>,
    },
    /// Show the synthesized status of an object
    Status {
        /// Kind (e.g. ksvc, Revision)
        kind: String,
        /// Object name
        name: String,
        /// Namespace
        #[arg(long, short = 'n')]
        namespace: Option<String>,
        /// Condition to summarize
        #[arg(long, default_value = READY)]
        condition: String,
        /// Output format: tree, json, yaml
        #[arg(long, short = 'o')]
        output: Option<OutputFormat>,
    },
    /// List duck-typed source kinds and their stored versions
    Sources {
        /// Output format: tree, json, yaml
        #[arg(long, short = 'o')]
        output: Option<OutputFormat>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::Config { subcommand } = args.command {
        return cli::handle_config_command(subcommand);
    }

    if let Some(log_path) = cli::init_logging(args.debug) {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, output={}",
        config.default_namespace,
        config.output
    );

    let context_name = kube::determine_context(args.context.as_deref());
    let client = kube::create_client(args.context.as_deref()).await?;
    tracing::info!("Connected to Kubernetes cluster: {}", context_name);

    match args.command {
        Command::Graph {
            kind,
            name,
            namespace,
            output,
        } => {
            let requested = ConfigLoader::requested_namespace(namespace);
            let namespace =
                kube::determine_namespace(requested.as_deref(), &context_name, &config.default_namespace);
            let ctx = render_context(&config, &namespace, client);
            let target = cli::parse_target(&kind, &name, &namespace)?;
            cli::handle_graph(&ctx, &target, output.unwrap_or(config.output)).await
        }
        Command::Status {
            kind,
            name,
            namespace,
            condition,
            output,
        } => {
            let requested = ConfigLoader::requested_namespace(namespace);
            let namespace =
                kube::determine_namespace(requested.as_deref(), &context_name, &config.default_namespace);
            let ctx = render_context(&config, &namespace, client);
            let target = cli::parse_target(&kind, &name, &namespace)?;
            cli::handle_status(&ctx, &target, &condition, output.unwrap_or(config.output)).await
        }
        Command::Sources { output } => {
            let ctx = render_context(&config, &config.default_namespace, client);
            cli::handle_sources(&ctx, &config.duck.registry, output.unwrap_or(config.output)).await
        }
        Command::Config { .. } => Ok(()),
    }
}

fn render_context(config: &Config, namespace: &str, client: ::kube::Client) -> RenderContext {
    let paths = Arc::new(OverviewPathResolver::new(&config.links.overview_root));
    let links = LinkResolver::new(
        &config.links.nested_api_prefix,
        &config.links.nested_root,
        paths.clone(),
    );
    RenderContext::new(namespace, Arc::new(KubeObjectClient::new(client)), paths).with_links(links)
}
