use clap::Parser;
use imdb_graph::{
    CallContext, ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, Imdb, Session, SubmissionShape,
};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Look up a movie, show or episode on IMDb and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "imdb-lookup", version, about)]
struct Cli {
    /// IMDb title id, e.g. tt0133093
    id: String,

    /// IETF language tag used for localized titles
    #[arg(long, env = "IMDB_LANGUAGE", default_value = "en-US")]
    language: String,

    /// Region code; defaults to the region of the language tag
    #[arg(long, env = "IMDB_REGION")]
    region: Option<String>,

    /// App version reported to the API
    #[arg(long, env = "IMDB_CLIENT_VERSION")]
    client_version: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "IMDB_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Send queries as JSON POST bodies instead of GET query strings
    #[arg(long)]
    post: bool,

    /// Page size for season and episode listings
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Worker threads used to fetch seasons in parallel
    #[arg(long, short = 'j', default_value_t = 1)]
    concurrency: usize,

    /// Give up on the whole lookup after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let session = Session::new(
        &cli.language,
        cli.region.as_deref(),
        cli.client_version.as_deref(),
    )?;

    let timeout = cli.timeout_secs.map(Duration::from_secs);
    let config = ClientConfig {
        endpoint: cli.endpoint,
        shape: if cli.post {
            SubmissionShape::Post
        } else {
            SubmissionShape::Get
        },
        page_size: cli.page_size,
        concurrency: cli.concurrency,
        timeout,
    };

    let imdb = Imdb::new(session, config)?;

    let ctx = match timeout {
        Some(budget) => CallContext::new().with_timeout(budget),
        None => CallContext::new(),
    };
    let title = imdb.lookup_title_with(&cli.id, &ctx)?;
    tracing::info!("Found {}", title);

    let output = if cli.compact {
        serde_json::to_string(&title)?
    } else {
        serde_json::to_string_pretty(&title)?
    };
    Ok(output)
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
