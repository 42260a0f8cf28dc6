//! # ShopDesk: catalog API and FAQ chatbot
//!
//! Usage:
//!   shopdesk serve                              # Start the HTTP gateway (default port 8000)
//!   shopdesk serve --port 9000 --db ./shop.db   # Custom port and database
//!   shopdesk ask --question "medios de pago"    # Answer one question from the store
//!   shopdesk seed                               # Append the sample FAQ set
//!   shopdesk init-config                        # Write ~/.shopdesk/config.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shopdesk_core::config::ShopDeskConfig;
use shopdesk_faq::{FaqIndex, MatchPolicy, seed::sample_faq};
use shopdesk_store::{FaqRepo, open_store};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shopdesk", version, about = "🛍️ ShopDesk: catalog API and FAQ chatbot")]
struct Cli {
    /// Config file (defaults to $SHOPDESK_CONFIG or ~/.shopdesk/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Database path, overrides store.path
    #[arg(long, global = true)]
    db: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer a single question against the stored FAQ
    Ask {
        #[arg(short, long)]
        question: String,
        /// Which endpoint profile to apply
        #[arg(long, value_enum, default_value_t = Profile::Ask)]
        profile: Profile,
        /// Override the profile threshold (0-100)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Append the built-in sample FAQ entries to the store
    Seed,
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Ask,
    Chat,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(ShopDeskConfig::resolve_path)
}

fn load_config(cli: &Cli) -> Result<ShopDeskConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = expand_path(path);
            ShopDeskConfig::load_from(&path)
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => ShopDeskConfig::load()?,
    };
    if let Some(db) = &cli.db {
        config.store.path = db.clone();
    }
    tracing::debug!("Store: {} ({})", config.store.backend, config.store.path);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "shopdesk=debug,shopdesk_core=debug,shopdesk_faq=debug,shopdesk_store=debug,shopdesk_gateway=debug,tower_http=debug"
    } else {
        "shopdesk=info,shopdesk_store=info,shopdesk_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { host, port } => {
            let mut config = load_config(&cli)?;
            if let Some(host) = host {
                config.gateway.host = host.clone();
            }
            if let Some(port) = port {
                config.gateway.port = *port;
            }
            let store = open_store(&config.store)?;
            shopdesk_gateway::start(config, store).await?;
        }
        Command::Ask {
            question,
            profile,
            threshold,
        } => {
            let config = load_config(&cli)?;
            let profile_config = match profile {
                Profile::Ask => &config.faq.ask,
                Profile::Chat => &config.faq.chat,
            };
            let mut policy = MatchPolicy::from_profile(profile_config)?;
            if let Some(t) = threshold {
                anyhow::ensure!((0.0..=100.0).contains(t), "threshold must be within 0..=100");
                policy.threshold = *t;
            }

            let store = open_store(&config.store)?;
            let index = FaqIndex::from_records(FaqRepo::new(store.as_ref()).records()?);
            let result = index.respond(question, &policy);

            println!("{}", result.answer);
            match &result.question {
                Some(q) => println!("\n✅ matched {q:?} (score {:.1})", result.score),
                None => println!(
                    "\n❌ no match (best {:.1} < threshold {}, {} entries)",
                    result.score,
                    policy.threshold,
                    index.len()
                ),
            }
        }
        Command::Seed => {
            let config = load_config(&cli)?;
            let store = open_store(&config.store)?;
            let repo = FaqRepo::new(store.as_ref());
            let added = repo.seed(&sample_faq())?;
            println!("✅ Added {added} FAQ entries ({} total)", repo.count()?);
        }
        Command::InitConfig { force } => {
            let path = config_path(&cli);
            if path.exists() && !force {
                println!("⚠️  {} already exists (use --force to overwrite)", path.display());
                return Ok(());
            }
            ShopDeskConfig::default().save_to(&path)?;
            println!("✅ Config written to {}", path.display());
        }
    }

    Ok(())
}
