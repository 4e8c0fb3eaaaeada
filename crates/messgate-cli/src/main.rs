//! Messgate CLI - schedule checks, gate verification and live entry feeds.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{admin, event, gate, student};
use config::ServiceArgs;

#[derive(Parser)]
#[command(name = "messgate")]
#[command(about = "Mess entry control: event schedules, token scans and gate feeds")]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an event form (exits 1 if it cannot be submitted)
    CheckEvent {
        /// Event form JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate and submit an event form
    CreateEvent {
        /// Event form JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Show the token id a scanner payload resolves to
    Extract {
        /// Raw decoded QR text
        text: String,
    },
    /// Show how a token status is classified
    Classify {
        /// Status label, e.g. USED
        status: String,
    },
    /// Verify a typed token id at the gate (exits 1 unless entry is allowed)
    Verify {
        /// Token id
        token: String,
    },
    /// Verify scanner payloads read from stdin, one per line
    Scan,
    /// Generate your token for the active event
    Generate,
    /// Show your token for the active event
    MyToken {
        /// Print the gate pass payload to encode as a QR code
        #[arg(long)]
        qr: bool,
        /// Holder name for the gate pass
        #[arg(long, default_value = "")]
        name: String,
        /// Holder register number for the gate pass
        #[arg(long, default_value = "")]
        register_number: String,
        /// Holder degree for the gate pass
        #[arg(long, default_value = "")]
        degree: String,
        /// Holder semester for the gate pass
        #[arg(long, default_value = "")]
        semester: String,
    },
    /// Show the event currently open
    ActiveEvent,
    /// List entries admitted for the active event
    Entries {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
        /// Refresh period in seconds
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
    /// Show token counters for the active event
    Stats,
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = cli.service;

    let result = match cli.command {
        Commands::CheckEvent { input, json } => event::check(input, json),
        Commands::CreateEvent { input } => event::create(&service, input).await,
        Commands::Extract { text } => gate::extract(&text),
        Commands::Classify { status } => gate::classify(&status),
        Commands::Verify { token } => gate::verify(&service, token).await,
        Commands::Scan => gate::scan(&service).await,
        Commands::Generate => student::generate(&service).await,
        Commands::MyToken {
            qr,
            name,
            register_number,
            degree,
            semester,
        } => {
            let holder = messgate_core::StudentInfo {
                name,
                register_number,
                degree,
                semester,
            };
            student::my_token(&service, qr.then_some(holder)).await
        }
        Commands::ActiveEvent => student::active_event(&service).await,
        Commands::Entries { watch, interval } => admin::entries(&service, watch, interval).await,
        Commands::Stats => admin::stats(&service).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
