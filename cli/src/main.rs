//! Carscout CLI binary: search vehicle listings through a tool-calling model.
//!
//! Subcommands: `search`, `ping`, `tool` (list/show), `serve`.

mod logging;

use carscout::{SearchRequest, DEFAULT_DISTANCE};
use clap::{Parser, Subcommand};
use cli::{CliError, ToolShowFormat};
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "carscout")]
#[command(about = "Carscout: find and summarize vehicle listings with a tool-calling model")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Output JSON (full conversation for search; JSON array for tool list; JSON for tool show)
    #[arg(long, global = true)]
    json: bool,

    /// Log enter/exit of every graph node (same as CARSCOUT_TRACE_NODES=1)
    #[arg(long, global = true)]
    trace_nodes: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search listings for one vehicle and print the model's summary
    Search(SearchArgs),
    /// Check the model endpoint with a fixed arithmetic question
    Ping,
    /// List or show tool definitions
    Tool(ToolArgs),
    /// Run the HTTP server (POST /search, GET /health)
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    make: String,
    #[arg(long)]
    model: String,
    #[arg(long)]
    year: i32,
    /// US zip code to search around
    #[arg(long, value_name = "ZIP")]
    zip_code: String,
    /// Search radius in miles
    #[arg(long, default_value_t = DEFAULT_DISTANCE)]
    distance: u32,
    /// Fail before running when AUTO_DEV_API_KEY or LLM_BASE_URL is missing
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Args, Debug)]
struct ToolArgs {
    #[command(subcommand)]
    sub: ToolCommand,
}

#[derive(Subcommand, Debug)]
enum ToolCommand {
    /// List all tools (name and description)
    List,
    /// Show the full definition of one tool (name, description, input_schema)
    Show(ShowToolArgs),
}

#[derive(clap::Args, Debug)]
struct ShowToolArgs {
    /// Tool name (e.g. search_auto_dev)
    name: String,
    /// Output format: yaml (default) or json
    #[arg(long, value_name = "FORMAT", default_value = "yaml")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Listen address (default 127.0.0.1:8080)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

async fn dispatch(args: Args) -> Result<Option<String>, CliError> {
    let mut config = AppConfig::from_env()?;
    config.trace_nodes |= args.trace_nodes;
    let output = match args.cmd {
        Command::Search(s) => {
            let request =
                SearchRequest::new(s.make, s.model, s.year, s.zip_code).with_distance(s.distance);
            cli::run_search(&config, request, s.strict, args.json).await?
        }
        Command::Ping => cli::run_ping(&config).await?,
        Command::Tool(t) => match t.sub {
            ToolCommand::List => cli::list_tools(&config, args.json).await?,
            ToolCommand::Show(show) => {
                let format = if args.json || show.output.eq_ignore_ascii_case("json") {
                    ToolShowFormat::Json
                } else {
                    ToolShowFormat::Yaml
                };
                cli::show_tool(&config, &show.name, format).await?
            }
        },
        Command::Serve(s) => {
            cli::serve(&config, s.addr.as_deref()).await?;
            return Ok(None);
        }
    };
    Ok(Some(output))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    // .env may set RUST_LOG / LOG_FILE, so apply sources before logging starts.
    let applied = config::load_and_apply(cli::APP_NAME, None);
    let _guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("carscout: logging: {}", e);
            None
        }
    };
    if let Err(e) = applied {
        tracing::warn!(error = %e, "config sources not applied");
    }

    match dispatch(args).await {
        Ok(Some(output)) => println!("{}", output.trim_end()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("carscout: {}", e);
            std::process::exit(1);
        }
    }
}
