//! Father CLI
//!
//! Usage:
//!   father config.yaml                      # Run forever
//!   father config.yaml --once               # One iteration, print a status line
//!   father config.yaml --once --json        # One iteration, print the report as JSON
//!   father config.yaml --dry-run            # Log actions instead of sending them
//!   father config.yaml --serve 127.0.0.1:3000  # Also serve GET /health and /status

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use father::core::{run_server, DadCompositor, Lexicon, MastodonClient, PollScheduler, SystemClock};
use father::types::BotConfig;
use father::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "father",
    version = VERSION,
    about = "Follows back whoever follows it, and says hi to people who are tired",
    long_about = "Father keeps a Mastodon account's follows in sync with its followers\n\
                  and watches the home timeline for posts like \"I'm tired\", answering\n\
                  about one in ten of them with \"Hi Tired, I'm Dad.\"\n\n\
                  Cadence:\n  \
                  every 5 minutes   poll the home timeline\n  \
                  every 4 hours     reconcile follows with followers\n  \
                  on rate limiting  wait an extra 10 minutes"
)]
struct Args {
    /// Path to the YAML config file
    config: PathBuf,

    /// Run a single iteration, print a status line (the report with --json) and exit
    #[arg(long)]
    once: bool,

    /// Log follow/unfollow/reply actions instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Serve the status API on this address (overrides status_addr)
    #[arg(long)]
    serve: Option<String>,

    /// Emit logs as JSON lines, and the --once report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.json);

    if let Err(e) = run(args).await {
        error!(error = %e, "fatal");
        eprintln!("father: {}", e);
        std::process::exit(1);
    }
}

/// Initialize logging, `RUST_LOG` overrides the default filter
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("father=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> father::Result<()> {
    let mut config = BotConfig::load(&args.config)?;
    if args.dry_run {
        config.policy.dry_run = true;
    }
    let status_addr = args.serve.clone().or_else(|| config.status_addr.clone());

    let lexicon = Lexicon::load(&config.lexicon_path)?;
    let client = Arc::new(MastodonClient::new(&config.instance_url, &config.access_token)?);

    info!(instance = %config.instance_url, version = VERSION, "starting");
    let mut scheduler = PollScheduler::start(
        client,
        DadCompositor::new(lexicon),
        Arc::new(SystemClock),
        StdRng::from_entropy(),
        config.policy.clone(),
    )
    .await?;

    if let Some(addr) = status_addr {
        let status = scheduler.status_handle();
        tokio::spawn(async move {
            if let Err(e) = run_server(&addr, status).await {
                error!(%addr, error = %e, "status API stopped");
            }
        });
    }

    if args.once {
        let report = scheduler.step().await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            let status = scheduler.status_handle();
            let snapshot = status.read().await;
            println!(
                "{} | seen={} | eligible={} | posted={}",
                snapshot.to_parseable_string(),
                report.items_seen,
                report.items_eligible,
                report.replies_posted
            );
        }
        return Ok(());
    }

    scheduler.run().await;
    Ok(())
}
