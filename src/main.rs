use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use judge_rating::{
    args::Args,
    database::DbClient,
    error::ProcessorError,
    messaging::RabbitMqConfig,
    model::RatingConfig,
    processor::{publish_contest_rated, rate_contest, render_json, render_table, rollback_contest, RateOptions}
};
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), ProcessorError> {
    let mut db = DbClient::connect(&args.connection_string).await?;

    if args.rollback {
        let touched = rollback_contest(&mut db, args.contest_id).await?;
        info!("Rolled back contest {} for {} users", args.contest_id, touched);
        return Ok(());
    }

    let options = RateOptions {
        contest_id: args.contest_id,
        commit: args.commit,
        force: args.force,
        config: RatingConfig {
            default_raw_elo: args.default_raw_elo,
            ..RatingConfig::default()
        }
    };

    let report = rate_contest(&mut db, &options, Utc::now().fixed_offset()).await?;

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_table(&report));
    }

    if report.saved > 0 {
        // The ratings are already committed; a failed notification only warns
        match RabbitMqConfig::from_env() {
            Ok(config) => {
                if let Err(e) = publish_contest_rated(&config, report.contest.id, report.saved).await {
                    warn!("Failed to publish contest rated message: {}", e);
                }
            }
            Err(e) => warn!("RabbitMQ credentials not configured ({}), skipping publish", e)
        }
    }

    Ok(())
}
