//! Metapedia CLI — command-line interface for the category path service
//!
//! Uses the metapedia-sdk RemoteClient to connect to a running server.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use metapedia_sdk::{CategoryPath, MetapediaClient, RemoteClient, ResolutionResult};

#[derive(Parser)]
#[command(name = "metapedia", version, about = "Metapedia category path CLI")]
struct Cli {
    /// Server HTTP URL
    #[arg(long, default_value = "http://localhost:8080", global = true, env = "METAPEDIA_URL")]
    url: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain how two categories relate
    Path {
        /// Source category key
        source: String,

        /// Target category key
        target: String,

        /// Language namespace
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// List recently resolved lookups
    Recent,
    /// Get server status
    Status,
    /// Ping the server
    Ping,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = RemoteClient::new(&cli.url);

    let result = match cli.command {
        Commands::Path { source, target, lang } => {
            run_path(&client, &lang, &source, &target, &cli.format).await
        }
        Commands::Recent => run_recent(&client, &cli.format).await,
        Commands::Status => run_status(&client, &cli.format).await,
        Commands::Ping => run_ping(&client).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_path(
    client: &RemoteClient,
    lang: &str,
    source: &str,
    target: &str,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = client.category_path(lang, source, target).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => {
            if result.is_empty() {
                println!("(no relationship found)");
                return Ok(());
            }
            println!("{}", path_table(&result));
        }
    }

    Ok(())
}

fn path_table(result: &ResolutionResult) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["kind", "via", "hops", "path"]);

    if let Some(d1) = &result.d1 {
        table.add_row(vec![
            "d1".to_string(),
            String::new(),
            d1.edges.len().to_string(),
            d1.nodes.join(" - "),
        ]);
    }
    for (kind, path) in [("d2", &result.d2), ("d3", &result.d3)] {
        if let Some(path) = path {
            table.add_row(vec![kind.to_string(), String::new(), path.len().to_string(), render(path)]);
        }
    }
    for stitched in result.d4s.iter().flatten() {
        table.add_row(vec![
            "d4".to_string(),
            stitched.ancestor.title.clone(),
            stitched.path.len().to_string(),
            render(&stitched.path),
        ]);
    }

    table
}

fn render(path: &CategoryPath) -> String {
    path.titles().join(" > ")
}

async fn run_recent(
    client: &RemoteClient,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let recent = client.recent().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recent)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["lang", "source", "target"]);
            for lookup in &recent {
                table.add_row(vec![&lookup.lang, &lookup.source, &lookup.target]);
            }
            println!("{}", table);
            println!("{} lookup(s)", recent.len());
        }
    }

    Ok(())
}

async fn run_status(
    client: &RemoteClient,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Table => {
            println!("Status:     {}", status.status);
            println!("Version:    {}", status.version);
            println!("Namespaces: {}", status.namespaces.join(", "));
            println!("Store:      {}", status.store.backend);
            if let Some(error) = &status.store.error {
                println!("Store error: {}", error);
            }
            println!(
                "Cache:      {}/{} (hits {}, misses {})",
                status.cache.len, status.cache.capacity, status.cache.hits, status.cache.misses
            );
            println!("Recent:     {}", status.recent);
        }
    }

    Ok(())
}

async fn run_ping(client: &RemoteClient) -> Result<(), Box<dyn std::error::Error>> {
    let result = client.ping().await?;
    println!("{}", result);
    Ok(())
}
