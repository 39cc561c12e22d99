use std::sync::Arc;

use anyhow::Result;
use cellsmith_cli::{plan_command, plans_command, signin_command};
use cellsmith_cloud::SupabaseAuth;
use cellsmith_core::BillingInterval;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cellsmith")]
#[command(about = "Cellsmith - AI formulas for your spreadsheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every plan
    Plans {
        /// Billing interval (monthly, yearly). Defaults to the configured one.
        #[arg(short, long)]
        interval: Option<BillingInterval>,

        /// Print JSON instead of plan cards
        #[arg(long)]
        json: bool,
    },
    /// Show a single plan (free, pro, team)
    Plan {
        id: String,

        #[arg(short, long)]
        interval: Option<BillingInterval>,

        #[arg(long)]
        json: bool,
    },
    /// Email yourself a magic sign-in link
    Signin { email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = cellsmith_core::Settings::load();
    let default_interval = settings.pricing.default_interval;

    match cli.command {
        Command::Plans { interval, json } => {
            println!("{}", plans_command(interval.unwrap_or(default_interval), json)?);
        }
        Command::Plan { id, interval, json } => {
            println!(
                "{}",
                plan_command(&id, interval.unwrap_or(default_interval), json)?
            );
        }
        Command::Signin { email } => {
            let provider = Arc::new(SupabaseAuth::from_settings(&settings)?);
            let report = signin_command(provider, &email).await?;
            print!("{}", report.rendered);
            if !report.succeeded() {
                anyhow::bail!("sign-in link was not sent");
            }
        }
    }

    Ok(())
}
