mod server;

use chrono::Utc;
use clap::{Parser, Subcommand};
use server::{run_server, AppState};
use space_bio_core::config::{
    DEFAULT_CMR_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL, DEFAULT_IMAGES_URL,
    DEFAULT_OSDR_URL,
};
use space_bio_core::{
    normalize_query, Aggregator, ArticlesClient, ChatResponder, GeminiClient, GeminiConfig,
    NasaEndpoints, NasaHttp, SearchQuery,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "space-bio", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OSDR biological data API base URL
    #[arg(long, env = "SPACE_BIO_OSDR_URL", default_value = DEFAULT_OSDR_URL)]
    osdr_url: String,

    /// CMR base URL
    #[arg(long, env = "SPACE_BIO_CMR_URL", default_value = DEFAULT_CMR_URL)]
    cmr_url: String,

    /// NASA Images API base URL
    #[arg(long, env = "SPACE_BIO_IMAGES_URL", default_value = DEFAULT_IMAGES_URL)]
    images_url: String,

    /// Generative language API base URL
    #[arg(long, env = "SPACE_BIO_GEMINI_URL", default_value = DEFAULT_GEMINI_URL)]
    gemini_url: String,

    /// Generative model used for the chat fallback
    #[arg(long, env = "SPACE_BIO_GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,

    /// API key for the chat fallback. GOOGLE_API_KEY is also honoured.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Overall timeout for each outbound request. Unbounded when unset.
    #[arg(long, env = "SPACE_BIO_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API.
    Serve {
        /// Address to bind
        #[arg(long, env = "SPACE_BIO_BIND", default_value = "127.0.0.1:8080")]
        bind: String,
        /// Message returned by /api/ping
        #[arg(long, env = "PING_MESSAGE", default_value = "ping")]
        ping_message: String,
    },
    /// Search every NASA source and print the ranked records.
    Search {
        /// Search query
        #[arg(long)]
        query: String,
        /// Requested number of records (up to twice as many are returned).
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Ask a question and print the structured answer.
    Chat {
        /// Question
        #[arg(long)]
        query: String,
    },
    /// Print the space biology article feed.
    Articles,
}

impl Cli {
    fn endpoints(&self) -> NasaEndpoints {
        NasaEndpoints {
            osdr: self.osdr_url.clone(),
            cmr: self.cmr_url.clone(),
            images: self.images_url.clone(),
        }
    }

    fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.gemini_url.clone(),
            model: self.gemini_model.clone(),
            api_key: self
                .gemini_api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .or_else(|| GeminiConfig::from_env().api_key),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let http = NasaHttp::new(cli.http_timeout_secs.map(Duration::from_secs))?;
    let endpoints = cli.endpoints();
    let aggregator = Arc::new(Aggregator::nasa(http.clone(), &endpoints)?);

    let gemini = GeminiClient::new(http.client().clone(), cli.gemini_config());
    if !gemini.is_configured() {
        warn!("no generative API key configured; chat fallback disabled");
    }
    let chat = Arc::new(ChatResponder::new(aggregator.clone(), Arc::new(gemini)));
    let articles = Arc::new(ArticlesClient::new(http, &endpoints.images));

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "space-bio boot"
    );

    match cli.command {
        Command::Serve { bind, ping_message } => {
            let state = AppState {
                aggregator,
                chat,
                articles,
                ping_message,
            };
            run_server(&bind, state).await?;
        }
        Command::Search { query, limit } => {
            let search_query = SearchQuery::from_input(&query, None, Some(limit))
                .ok_or_else(|| anyhow::anyhow!("Missing query"))?;

            let result = aggregator.aggregate(&search_query).await;
            println!("query: {}", search_query.text);
            for (position, document) in result.results.iter().enumerate() {
                println!(
                    "{:>2}. [{}] {} ({})",
                    position + 1,
                    document.source,
                    document.title,
                    document.id
                );
                println!("    {}", document.link);
            }
            println!("total: {}", result.total);
        }
        Command::Chat { query } => {
            let question = normalize_query(&query);
            if question.is_empty() {
                anyhow::bail!("Missing query");
            }

            let answer = chat.answer(&question, Default::default()).await;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Command::Articles => {
            let response = articles
                .latest()
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
