use clap::Parser;
use sepolq_policy::{FsSource, LoggingConfig, PolicySearch, QueryMode, SearchConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

mod error;

use error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "sepolq")]
#[command(about = "Print the define or interface declaration for a name in SELinux policy sources")]
#[command(version)]
struct Args {
    /// Directory that contains all of the sub-directories of SELinux policies to search
    directory: Option<PathBuf>,

    /// Interface or define name to look up
    query: Option<String>,

    /// YAML config file (default: $SEPOLQ_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat QUERY as a regular expression instead of a literal name
    #[arg(long)]
    regex: bool,

    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        println!("ERROR: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> Result<()> {
    let directory = args.directory.ok_or(CliError::MissingDirectory)?;
    let query = args.query.ok_or(CliError::MissingQuery)?;

    let config_path = args
        .config
        .or_else(|| std::env::var_os("SEPOLQ_CONFIG").map(PathBuf::from));
    let mut config = load_config(config_path.as_deref())?;
    if args.regex {
        config.query_mode = QueryMode::Regex;
    }

    init_tracing(&config.logging, args.verbose);
    tracing::debug!(
        "sepolq starting: query='{}' mode={} extensions=.{}/.{}",
        query,
        config.query_mode,
        config.interface_extension,
        config.support_extension
    );

    let directory = resolve(directory);
    let source = FsSource::new(&directory, &config)?;
    let construct = PolicySearch::new(source, config.query_mode).find(&query)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(construct.text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    let config = match path {
        Some(path) => SearchConfig::from_file(path)?.with_env_overrides()?,
        None => SearchConfig::from_env()?,
    };
    Ok(config)
}

/// Absolute form of the directory argument, with symlinks resolved when it
/// exists.
fn resolve(directory: PathBuf) -> PathBuf {
    directory
        .canonicalize()
        .or_else(|_| std::path::absolute(&directory))
        .unwrap_or(directory)
}

/// Logs go to stderr so stdout carries only the construct text
fn init_tracing(logging: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
