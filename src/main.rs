//! stroke-risk: form-based stroke risk estimate with health advice.
//!
//! Usage:
//!   stroke-risk serve [--bind 127.0.0.1:8501]
//!   stroke-risk assess --age 67 --glucose 228.7 --bmi 36.6 --hypertension 0 ...

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use stroke_risk::{
    build_evaluator,
    config::{Config, RuntimeConfig, load_env_file},
    features::{DEFAULT_AGE, DEFAULT_BMI, DEFAULT_GLUCOSE, RawFeatureForm},
    http::start_http_server,
    locale::Locale,
    report::{Submission, assess_form, render_text},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stroke-risk")]
#[command(about = "Stroke risk estimate with rule-based health advice", long_about = None)]
struct Cli {
    /// Display language (fr or en); overrides the config file
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web form (default)
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8501
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Evaluate one patient from flags and print the report
    Assess(AssessArgs),
}

#[derive(clap::Args)]
struct AssessArgs {
    #[arg(long, default_value_t = DEFAULT_AGE.to_string())]
    age: String,
    #[arg(long = "glucose", default_value_t = DEFAULT_GLUCOSE.to_string())]
    avg_glucose_level: String,
    #[arg(long, default_value_t = DEFAULT_BMI.to_string())]
    bmi: String,
    #[arg(long, default_value = "Male")]
    gender: String,
    #[arg(long, default_value = "0")]
    hypertension: String,
    #[arg(long, default_value = "0")]
    heart_disease: String,
    #[arg(long, default_value = "Yes")]
    ever_married: String,
    #[arg(long, default_value = "Private")]
    work_type: String,
    #[arg(long, default_value = "Urban")]
    residence_type: String,
    #[arg(long, default_value = "never smoked")]
    smoking_status: String,
}

impl From<AssessArgs> for RawFeatureForm {
    fn from(args: AssessArgs) -> Self {
        Self {
            age: args.age,
            avg_glucose_level: args.avg_glucose_level,
            bmi: args.bmi,
            gender: args.gender,
            hypertension: args.hypertension,
            heart_disease: args.heart_disease,
            ever_married: args.ever_married,
            work_type: args.work_type,
            residence_type: args.residence_type,
            smoking_status: args.smoking_status,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env may carry RUST_LOG, and config loading logs
    load_env_file();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(RuntimeConfig::load_from_env().log_level))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;
    if let Some(locale) = cli.locale {
        config.system.locale = locale;
    }

    let evaluator = build_evaluator(&config)?;
    info!("Model '{}' ready", evaluator.model_name());

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.http.bind = bind;
            }
            start_http_server(evaluator, Arc::new(config)).await?;
        }
        Commands::Assess(args) => {
            let submission = assess_form(&evaluator, &args.into());
            println!("{}", render_text(&submission, config.system.locale));
            if matches!(submission, Submission::Failed) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
