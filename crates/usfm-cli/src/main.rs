use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::fmt::time;
use tracing_subscriber::EnvFilter;
use usfm_acquire::{ConvertOptions, HttpSource};

#[derive(Parser)]
#[command(name = "wiki-usfm")]
#[command(about = "Convert the Ohienko Bible on Ukrainian Wikisource into USFM files")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every book linked from the index page and write <CODE>.usfm files
    Convert {
        /// Listing page with links to each book
        #[arg(long, default_value = usfm_acquire::INDEX_URL)]
        index_url: String,

        /// Origin that relative book links are resolved against
        #[arg(long, default_value = usfm_acquire::ORIGIN)]
        origin: String,

        /// Output directory for .usfm files (created if absent)
        #[arg(short = 'O', long, default_value = usfm_acquire::OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Only convert these book codes (repeatable, e.g. --book GEN --book EXO)
        #[arg(short, long = "book")]
        books: Vec<String>,

        /// Keep fetched HTML under <output-dir>/raw/
        #[arg(long)]
        cache_html: bool,
    },

    /// Resolve and print the book index without converting anything
    Books {
        /// Listing page with links to each book
        #[arg(long, default_value = usfm_acquire::INDEX_URL)]
        index_url: String,

        /// Origin that relative book links are resolved against
        #[arg(long, default_value = usfm_acquire::ORIGIN)]
        origin: String,
    },

    /// Print the title-to-code lookup table in match order
    Table,

    /// Check the structure of generated .usfm files
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &LogLevel, utc: bool) {
    // HTML parsing crates are chatty at debug/trace
    let directives = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    // e.g. 2026-10-18 09:14:02.517 +03:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    if utc {
        builder.with_timer(time::ChronoUtc::new(time_format)).init();
    } else {
        builder.with_timer(time::ChronoLocal::new(time_format)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.utc);

    match cli.command {
        Commands::Convert {
            index_url,
            origin,
            output_dir,
            books,
            cache_html,
        } => {
            tracing::info!(output_dir = %output_dir.display(), "Converting books");
            let source = HttpSource::new()?;
            let opts = ConvertOptions {
                index_url,
                origin,
                output_dir,
                books,
                cache_html,
            };
            usfm_acquire::run(&source, &opts).await?;
        }
        Commands::Books { index_url, origin } => {
            let source = HttpSource::new()?;
            let books = usfm_acquire::list_books(&source, &index_url, &origin).await?;
            for book in &books {
                println!("{}\t{}\t{}", book.code, book.title, book.url);
            }
        }
        Commands::Table => {
            for entry in usfm_model::BOOK_TABLE {
                println!("{}\t{}", entry.code, entry.key);
            }
        }
        Commands::Validate { files } => {
            let mut failed = 0;
            for file in &files {
                let errors = usfm_validate::validate(file)?;
                if errors.is_empty() {
                    tracing::info!(file = %file.display(), "Valid");
                } else {
                    failed += 1;
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} files have validation errors", files.len());
            }
        }
    }

    Ok(())
}
