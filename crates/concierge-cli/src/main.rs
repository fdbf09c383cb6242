//! Purchasing concierge CLI — run seller agents or talk to them
//!
//! `concierge serve` hosts one of the built-in sellers over A2A;
//! `concierge ask` routes a buyer request through the coordinator;
//! `concierge card` prints a remote agent's descriptor.

mod agent;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use agent::PurchasingAgent;
use concierge_a2a::discovery::AgentCardClient;
use concierge_core::config::ConciergeConfig;
use concierge_sellers::{
    ProductSeller, SellerAgent, SellerServer, SellerServerConfig, burger_seller, pizza_seller,
};

/// Purchasing concierge — delegates buyer requests to remote seller agents.
#[derive(Parser)]
#[command(name = "concierge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one of the built-in seller agents.
    Serve {
        /// Which seller to run.
        #[arg(long, value_enum)]
        seller: SellerKind,
        /// Bind address.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Bind port.
        #[arg(long, default_value_t = 10000)]
        port: u16,
        /// Public URL advertised on the agent card (defaults to the bind address).
        #[arg(long)]
        public_url: Option<String>,
        /// Require this bearer token on every RPC.
        #[arg(long)]
        require_token: Option<String>,
    },
    /// Send a request through the purchasing concierge.
    Ask {
        /// Natural-language request, e.g. "order 1 cheeseburger".
        query: String,
        /// Path to the concierge config file; falls back to the
        /// CONCIERGE_CONFIG environment variable, then "concierge.toml".
        #[arg(long)]
        config: Option<PathBuf>,
        /// Conversation context id; generated when absent.
        #[arg(long)]
        session: Option<String>,
    },
    /// Fetch and print a remote agent's card.
    Card {
        /// Base URL of the agent.
        url: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SellerKind {
    Burger,
    Pizza,
    Product,
}

impl SellerKind {
    fn build(self) -> Arc<dyn SellerAgent> {
        match self {
            SellerKind::Burger => Arc::new(burger_seller()),
            SellerKind::Pizza => Arc::new(pizza_seller()),
            SellerKind::Product => Arc::new(ProductSeller::new()),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            seller,
            host,
            port,
            public_url,
            require_token,
        } => {
            let server = SellerServer::new(
                seller.build(),
                SellerServerConfig {
                    host,
                    port,
                    public_url,
                    require_token,
                },
            );
            server.serve().await
        }
        Commands::Ask {
            query,
            config,
            session,
        } => {
            let path = config
                .or_else(|| std::env::var("CONCIERGE_CONFIG").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("concierge.toml"));
            let config = ConciergeConfig::load(&path)?;
            let agent = PurchasingAgent::connect(&config).await?;
            let reply = agent.ask(&query, session.as_deref()).await?;
            println!("{reply}");
            Ok(())
        }
        Commands::Card { url } => {
            let card = AgentCardClient::new(None).fetch(&url).await?;
            println!("{}", serde_json::to_string_pretty(&card)?);
            Ok(())
        }
    }
}
