use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lettergate::cli::OutputFormat;
use lettergate::cli::commands::analyze::LetterInput;

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "lettergate")]
#[command(
    version,
    about = "Analyze official letters through ranked LLM providers with automatic fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show provider health and quota usage
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json, yaml"
        )]
        format: OutputFormat,
    },

    /// Analyze a letter
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, help = "MIME type of --file (guessed from the extension by default)")]
        mime: Option<String>,
        #[arg(short = 'l', long, help = "Output language code (en, ru)")]
        language: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json, yaml"
        )]
        format: OutputFormat,
    },

    /// Send a test prompt to every provider
    Probe {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json, yaml"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    #[arg(long, help = "Letter text")]
    text: Option<String>,
    #[arg(long, help = "Image or PDF file of the letter")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text (TOML), json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mLetterGate encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    // Provider credentials conventionally live in .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Status { format } => {
            lettergate::cli::commands::status::run(format)?;
        }
        Commands::Analyze {
            input,
            mime,
            language,
            format,
        } => {
            let input = match (input.text, input.file) {
                (Some(text), _) => LetterInput::Text(text),
                (None, Some(path)) => LetterInput::File { path, mime },
                (None, None) => anyhow::bail!("Either --text or --file is required"),
            };
            let rt = Runtime::new()?;
            rt.block_on(lettergate::cli::commands::analyze::run(input, language, format))?;
        }
        Commands::Probe { format } => {
            let rt = Runtime::new()?;
            rt.block_on(lettergate::cli::commands::probe::run(format))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                lettergate::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                lettergate::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                lettergate::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
