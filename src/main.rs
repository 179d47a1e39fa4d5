use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evgrid::arm::{ArmClient, ArmHttpClient, ResourceGroupId, SubscriptionId};
use evgrid::config::Config;
use evgrid::eventgrid::{
    EventSubscriptionPredicate, EventSubscriptionsClient, ListOptions, ListScope,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Environment variable holding a pre-acquired ARM bearer token
const TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

/// List Azure Event Grid event subscriptions
#[derive(Parser, Debug)]
#[command(name = "evgrid", version, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List event subscriptions
    List(ListArgs),
    /// Store a default subscription in the config file
    SetSubscription {
        subscription_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Azure subscription to list under
    #[arg(short, long)]
    subscription: Option<String>,

    /// Restrict to a resource group
    #[arg(short, long)]
    resource_group: Option<String>,

    /// List regional subscriptions in this location
    #[arg(short, long)]
    location: Option<String>,

    /// OData $filter expression
    #[arg(long)]
    filter: Option<String>,

    /// Page size requested from the server
    #[arg(long)]
    top: Option<i64>,

    /// Follow nextLink until every page is loaded
    #[arg(long)]
    all: bool,

    /// Only keep subscriptions with this exact name (with --all)
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("evgrid started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("evgrid").join("evgrid.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".evgrid").join("evgrid.log");
    }
    PathBuf::from("evgrid.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();

    let result = match args.command {
        Command::List(list) => run_list(&config, list).await,
        Command::SetSubscription { subscription_id } => config
            .set_subscription(&subscription_id)
            .context("Failed to save configuration"),
    };

    if let Err(err) = &result {
        tracing::error!("{:?}", err);
        eprintln!("Error: {}", format_error(err));
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}

fn build_client(config: &Config) -> Result<EventSubscriptionsClient> {
    let mut transport = ArmHttpClient::new().context("Failed to create HTTP client")?;
    if let Some(retries) = config.max_retries {
        transport = transport.with_max_retries(retries);
    }
    if let Some(timeout) = config.request_timeout() {
        transport = transport.with_timeout(timeout);
    }
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        transport = transport.with_bearer_token(token);
    }

    let client = ArmClient::with_transport(config.client_options(), Arc::new(transport));
    Ok(EventSubscriptionsClient::new(client))
}

fn list_scope(subscription: String, args: &ListArgs) -> ListScope {
    match (&args.resource_group, &args.location) {
        (Some(rg), Some(location)) => ListScope::RegionalByResourceGroup {
            resource_group: ResourceGroupId::new(subscription, rg.clone()),
            location: location.clone(),
        },
        (Some(rg), None) => ListScope::GlobalByResourceGroup(ResourceGroupId::new(subscription, rg.clone())),
        (None, Some(location)) => ListScope::RegionalBySubscription {
            subscription: SubscriptionId::new(subscription),
            location: location.clone(),
        },
        (None, None) => ListScope::GlobalBySubscription(SubscriptionId::new(subscription)),
    }
}

async fn run_list(config: &Config, args: ListArgs) -> Result<()> {
    let Some(subscription) = config.effective_subscription(args.subscription.as_deref()) else {
        return Err(anyhow::anyhow!(
            "No Azure subscription configured. Set {} or use --subscription",
            evgrid::config::SUBSCRIPTION_ENV
        ));
    };

    let client = build_client(config)?;
    let scope = list_scope(subscription, &args);

    let mut options = ListOptions::new();
    if let Some(filter) = &args.filter {
        options = options.with_filter(filter.clone());
    }
    if let Some(top) = args.top {
        options = options.with_top(top);
    }

    tracing::info!("Listing {} ({})", scope.path(), scope.operation());

    if args.all {
        let predicate = EventSubscriptionPredicate {
            name: args.name.clone(),
            ..Default::default()
        };
        let result = client
            .list_complete_matching_predicate(&scope, &options, &predicate)
            .await?;
        tracing::info!("Loaded {} subscriptions", result.items.len());
        println!("{}", serde_json::to_string_pretty(&result.items)?);
    } else {
        let page = client.list(&scope, &options).await?;
        let output = serde_json::json!({
            "value": page.items(),
            "nextLink": page.next_link(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Format an error for display, with friendlier text for common statuses
fn format_error(error: &anyhow::Error) -> String {
    let status = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<evgrid::Error>())
        .and_then(evgrid::Error::status);

    match status {
        Some(401) => format!("Authentication failed. Set {} to a valid ARM token.", TOKEN_ENV),
        Some(403) => "Permission denied. Check your Azure role assignments.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        _ => error
            .chain()
            .map(|cause| cause.to_string())
            .collect::<Vec<_>>()
            .join(": "),
    }
}
