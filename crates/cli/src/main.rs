use clap::{Parser, Subcommand};
use icu_core::config::capacity_overrides_from_env_value;
use icu_core::{normalize_risk_counts, CoreConfig, NormalizedWard, RiskCounts, WardStatusService};
use icu_gateway::{Gateway, UpstreamConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "icu")]
#[command(about = "ICU ward status operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the normalized status of every ward
    Status {
        /// Also write the balanced risk counts back and wait for it to finish
        #[arg(long)]
        sync: bool,
    },
    /// Balance one set of risk counts against a patient count
    Normalize {
        high: u32,
        medium: u32,
        low: u32,
        /// Number of patients on the ward
        patients: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("icu_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { sync } => status(sync).await?,
        Commands::Normalize {
            high,
            medium,
            low,
            patients,
        } => {
            let balanced = normalize_risk_counts(RiskCounts::new(high, medium, low), patients);
            println!(
                "high={} medium={} low={}",
                balanced.high, balanced.medium, balanced.low
            );
        }
    }

    Ok(())
}

async fn status(sync: bool) -> anyhow::Result<()> {
    let upstream = UpstreamConfig::from_lookup(|name| std::env::var(name).ok())?;
    let gateway = Gateway::new(&upstream)?;

    let cfg = Arc::new(CoreConfig::new(
        capacity_overrides_from_env_value(std::env::var("ICU_BED_OVERRIDES").ok())?,
        sync,
    ));
    let service = WardStatusService::new(
        cfg,
        Arc::new(gateway.hosxp.clone()),
        Arc::new(gateway.icu_db.clone()),
    );

    let wards = match service.ward_status().await {
        Ok(wards) => wards,
        Err(e) => {
            let reply = e.reply();
            anyhow::bail!("{} (status {}): {}", e, reply.status, reply.body);
        }
    };
    print_wards(&wards);

    if let Some(handle) = service.spawn_risk_sync(&wards) {
        let report = handle.await?;
        println!("Synced {} wards, {} failed", report.updated, report.failed);
    }

    Ok(())
}

fn print_wards(wards: &[NormalizedWard]) {
    if wards.is_empty() {
        println!("No wards found.");
        return;
    }

    println!(
        "{:<6} {:<28} {:>5} {:>8} {:>6} {:>5} {:>6} {:>4}",
        "CODE", "WARD", "BEDS", "PATIENTS", "AVAIL", "HIGH", "MEDIUM", "LOW"
    );
    for w in wards {
        println!(
            "{:<6} {:<28} {:>5} {:>8} {:>6} {:>5} {:>6} {:>4}",
            w.ward_code,
            w.ward_name,
            w.total_beds,
            w.patient_count,
            w.available_beds,
            w.high_risk,
            w.medium_risk,
            w.low_risk
        );
    }
}
