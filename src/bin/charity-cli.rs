use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use charity_client::config::{load_config, ClientConfig};
use charity_client::i18n::{ContentResolver, TranslationClient};
use charity_client::security::{run_security_tests, ProofFile, SecurityContext};
use charity_client::storage::SessionStore;
use charity_client::submit::{DonationForm, DonationOutcome, SecureClient};

#[derive(Parser)]
#[command(name = "charity-cli")]
#[command(about = "Command-line client for the charity donation service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a donation confirmation
    Submit {
        #[arg(long)]
        name: String,
        /// Email address or phone number
        #[arg(long)]
        contact: String,
        #[arg(long)]
        bank: String,
        #[arg(long)]
        amount: String,
        /// Bank transaction reference
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        message: Option<String>,
        /// Path to a proof-of-payment image
        #[arg(long)]
        proof: Option<PathBuf>,
    },
    /// Run the built-in security self-tests
    Selftest,
    /// Dump the buffered security events
    Events,
    /// List supported languages
    Languages,
    /// Translate a text key or literal text
    Translate {
        text: String,
        #[arg(short, long, default_value = "am")]
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charity_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    let store = match &config.storage.session_path {
        Some(path) => Arc::new(SessionStore::open(path.as_ref())),
        None => Arc::new(SessionStore::in_memory()),
    };

    match cli.command {
        Commands::Submit {
            name,
            contact,
            bank,
            amount,
            reference,
            message,
            proof,
        } => {
            let security = Arc::new(SecurityContext::new(store, &config.security));
            security.initialize();

            let client = SecureClient::new(config, security);

            let proof_file = match proof {
                Some(path) => Some(ProofFile::from_path(&path).await?),
                None => None,
            };

            let form = DonationForm {
                name,
                contact,
                bank,
                amount,
                transaction_reference: reference.unwrap_or_default(),
                message: message.unwrap_or_default(),
            };

            match client.submit_confirmation(&form, proof_file.as_ref()).await {
                Ok(DonationOutcome::Confirmed(receipt)) => {
                    println!(
                        "Donation confirmed: {}",
                        receipt.transaction_reference.as_deref().unwrap_or("(no reference)")
                    );
                }
                Ok(DonationOutcome::Rejected { message }) => {
                    eprintln!("Submission rejected: {message}");
                }
                Err(e) => {
                    client.record_submit_failure(&e);
                    eprintln!("Submission failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Selftest => {
            let results = run_security_tests();
            let all_passed = results.iter().all(|r| r.passed);
            println!("{}", serde_json::to_string_pretty(&results)?);
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Events => {
            let security = Arc::new(SecurityContext::new(store, &config.security));
            println!(
                "{}",
                serde_json::to_string_pretty(&security.log.snapshot())?
            );
        }
        Commands::Languages => {
            let client = TranslationClient::new(&config.translation, &config.timeouts);
            for lang in client.remote_languages().await {
                println!("{}\t{}\t{}", lang.code, lang.name, lang.native_name);
            }
        }
        Commands::Translate { text, target } => {
            let client = Arc::new(TranslationClient::new(&config.translation, &config.timeouts));
            let resolver = ContentResolver::new(client.clone(), store);

            // Keys resolve through the static resources; anything else
            // is translated as literal text.
            let source_text = resolver.final_text(&text, None);
            println!("{}", client.translate(&source_text, &target, "en").await);
        }
    }

    Ok(())
}
