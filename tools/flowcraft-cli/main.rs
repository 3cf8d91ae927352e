use clap::{Parser, ValueEnum};
use flowcraft::config::LoggingConfig;
use flowcraft::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportCli {
    Json,
    Csv,
}

impl From<ExportCli> for ExportFormat {
    fn from(value: ExportCli) -> Self {
        match value {
            ExportCli::Json => ExportFormat::Json,
            ExportCli::Csv => ExportFormat::Csv,
        }
    }
}

/// Loads a workflow document, feeds datasets into its source nodes and runs it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow document JSON file
    document: PathBuf,

    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "flowcraft.toml")]
    config: PathBuf,

    /// Dataset for a source node, as NODE=PATH. `.csv` files are read as CSV, anything
    /// else as JSON. May be repeated.
    #[arg(short, long = "data", value_name = "NODE=PATH")]
    data: Vec<String>,

    /// Node to run, in order. Each run re-propagates the node's outgoing edges.
    #[arg(short, long = "run", value_name = "NODE")]
    run: Vec<String>,

    /// Run every node in dependency order instead of the --run list
    #[arg(short, long)]
    evaluate: bool,

    /// Extra node type name, as NAME=BUILTIN (for example `csvInput=source`)
    #[arg(long = "type-map", value_name = "NAME=BUILTIN")]
    type_map: Vec<String>,

    /// Export the final preview in this format
    #[arg(long, value_enum)]
    export: Option<ExportCli>,

    /// Where to write the export (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Persist the resulting workflow to the configured store
    #[arg(long)]
    save: bool,
}

fn main() {
    let cli = Cli::parse();

    // The configured filter is not known until the file is read, so loading logs
    // through a subscriber built from the default filter.
    let bootstrap = log_subscriber(&LoggingConfig::default().filter);
    let config =
        tracing::subscriber::with_default(bootstrap, || FlowcraftConfig::load(&cli.config))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load configuration: {}", e)));

    tracing::subscriber::set_global_default(log_subscriber(&config.logging.filter))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to install logging: {}", e)));

    let graph = build_graph(&cli);
    let graph = load_datasets(graph, &cli.data);
    let graph = if cli.evaluate {
        graph
            .evaluate_all()
            .unwrap_or_else(|e| exit_with_error(&format!("Evaluation failed: {}", e)))
    } else {
        run_nodes(graph, &cli.run)
    };

    match graph.preview() {
        Some(preview) => {
            println!("{}", PreviewFormatter::new(config.preview.max_rows).format(preview));
            if let Some(format) = cli.export {
                export(preview, format.into(), cli.output.as_ref());
            }
        }
        None => {
            println!("No preview: no node has been run.");
            if cli.export.is_some() {
                exit_with_error("Nothing to export");
            }
        }
    }

    if cli.save {
        let mut workspace = Workspace::open(config.open_store())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to open workflow store: {}", e)));
        let id = graph.id().to_string();
        workspace
            .insert_workflow(graph)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save workflow: {}", e)));
        println!(
            "Saved workflow '{}' to '{}'",
            id,
            workspace.store().path().display()
        );
    }
}

/// `RUST_LOG` wins over `filter` when it is set.
fn log_subscriber(filter: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
}

fn build_graph(cli: &Cli) -> WorkflowGraph {
    let document = WorkflowDocument::from_file(&cli.document).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load workflow document '{}': {}",
            cli.document.display(),
            e
        ))
    });

    let builder = cli
        .type_map
        .iter()
        .fold(WorkflowBuilder::new(document), |builder, mapping| {
            let (name, builtin) = split_pair(mapping);
            builder.with_type_mapping(name, builtin)
        });
    builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid workflow document: {}", e)))
}

fn load_datasets(graph: WorkflowGraph, entries: &[String]) -> WorkflowGraph {
    entries.iter().fold(graph, |graph, entry| {
        let (node_id, path) = split_pair(entry);
        if graph.node(node_id).is_none() {
            exit_with_error(&format!("Unknown source node '{}'", node_id));
        }
        let content = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read dataset '{}': {}", path, e))
        });
        let table = codec_for_path(path).parse(&content).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to parse dataset '{}': {}", path, e))
        });
        println!(
            "Loaded {} row(s) into '{}' from '{}'",
            table.rows.len(),
            node_id,
            path
        );
        graph.upload_source_data(table.into_dataset(node_id, path))
    })
}

fn run_nodes(graph: WorkflowGraph, nodes: &[String]) -> WorkflowGraph {
    nodes.iter().fold(graph, |graph, node_id| {
        graph
            .run_operation(node_id)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()))
            .propagate_from(node_id)
    })
}

fn export(preview: &TabularValue, format: ExportFormat, output: Option<&PathBuf>) {
    let text = export_preview(preview, format)
        .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            println!("Exported {} preview to '{}'", format, path.display());
        }
        None => println!("{}", text),
    }
}

fn split_pair(raw: &str) -> (&str, &str) {
    raw.split_once('=')
        .unwrap_or_else(|| exit_with_error(&format!("Expected KEY=VALUE, got '{}'", raw)))
}

/// Helper function to print an error message and exit the process.
fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
