use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use m2x_connector::{
    duration::parse_duration, ConnectorConfig, FileStateStore, HttpStreamApi, OutputRecord, Poll,
    Relationship, StreamPublisher, StreamReader,
};

#[derive(Parser, Debug)]
#[command(name = "m2x")]
#[command(about = "Bridge between data-flow pipelines and M2X device data streams")]
struct Args {
    /// Config file (TOML/JSON); M2X_* environment variables layer on top
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// M2X API key (overrides config file and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// M2X API URL
    #[arg(long)]
    api_url: Option<String>,

    /// Device id
    #[arg(short, long)]
    device: Option<String>,

    /// Stream name
    #[arg(short, long)]
    stream: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one read invocation and print the emitted records as JSON lines
    Get {
        /// How far back to bound the first fetch when no cursor is stored
        /// (e.g. "10 min"; "0s" means no lower bound)
        #[arg(long, default_value = "0s")]
        start_time_ago: String,

        /// JSON file holding the per-stream cursor state
        #[arg(long, default_value = "m2x-state.json")]
        state_file: PathBuf,
    },
    /// Read stdin and publish it as the stream's newest value
    Put,
}

/// File and environment settings; CLI flags override them.
#[derive(Debug, Default, serde::Deserialize)]
struct Settings {
    api_key: Option<String>,
    api_url: Option<String>,
    device_id: Option<String>,
    stream_name: Option<String>,
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path.clone()));
    }
    builder = builder.add_source(config::Environment::with_prefix("M2X"));

    let settings = builder
        .build()
        .context("loading configuration")?
        .try_deserialize()
        .context("reading configuration values")?;
    Ok(settings)
}

fn connector_config(args: &Args, start_time_ago: Duration) -> Result<ConnectorConfig> {
    let settings = load_settings(args.config.as_ref())?;

    let mut builder = ConnectorConfig::builder().start_time_ago(start_time_ago);
    if let Some(api_key) = args.api_key.clone().or(settings.api_key) {
        builder = builder.api_key(api_key);
    }
    if let Some(api_url) = args.api_url.clone().or(settings.api_url) {
        builder = builder.api_url(api_url);
    }
    if let Some(device_id) = args.device.clone().or(settings.device_id) {
        builder = builder.device_id(device_id);
    }
    if let Some(stream_name) = args.stream.clone().or(settings.stream_name) {
        builder = builder.stream_name(stream_name);
    }

    Ok(builder.build()?)
}

fn record_json(record: &OutputRecord) -> serde_json::Value {
    serde_json::json!({
        "payload": record.payload,
        "attributes": record.attributes,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Get {
            start_time_ago,
            state_file,
        } => {
            let ago = parse_duration(start_time_ago)?;
            let config = connector_config(&args, ago)?;

            let api = HttpStreamApi::new(&config);
            let store = FileStateStore::new(state_file);
            let reader = StreamReader::new(&config, api, store);

            match reader.poll().await? {
                Poll::Emitted(records) => {
                    for record in &records {
                        println!("{}", serde_json::to_string(&record_json(record))?);
                    }
                    eprintln!("{} record(s)", records.len());
                }
                Poll::Yield => bail!("invocation yielded, see the log for the cause"),
            }
        }
        Command::Put => {
            let config = connector_config(&args, Duration::ZERO)?;

            let api = HttpStreamApi::new(&config);
            let publisher = StreamPublisher::new(&config, api);

            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("reading stdin")?;

            let disposition = publisher.publish(&content).await;
            if disposition.relationship == Relationship::Failure {
                bail!("publish failed, see the log for the cause");
            }
            eprintln!("published");
        }
    }

    Ok(())
}
