// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use linguatec_lexicon::app_config::{self, Config};
use linguatec_lexicon::import::{DataImportOptions, MonoImportOptions, VariationImportOptions};
use linguatec_lexicon::{Controller, ImportReport, LexiconCode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the REST API and the upload validators
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import bilingual entries (term, gramcats, translation, examples, conjugation)
    ImportData {
        /// Lexicon code, e.g. es-ar
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        /// Spreadsheet or CSV file
        input_file: PathBuf,

        /// Validate only, never write
        #[arg(long)]
        dry_run: bool,

        /// Accept verbal conjugations lacking some tenses
        #[arg(long)]
        allow_partial: bool,
    },

    /// Import a monolingual dictionary (term, url, etimol, definitions)
    ImportMono {
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        input_file: PathBuf,

        /// Delete the lexicon's words first
        #[arg(long)]
        truncate: bool,

        /// Keep italic markup of the etymology column (needs LibreOffice)
        #[arg(long)]
        etimol_rich_text: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Import grammatical categories from a CSV file (abbreviation,title)
    ImportGramcat {
        input_file: PathBuf,

        /// Delete every category first
        #[arg(long)]
        purge: bool,
    },

    /// Import the entries of a diatopic variation
    ImportVariation {
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        input_file: PathBuf,

        /// Diatopic variation name (optional with --dry-run)
        #[arg(long)]
        variation: Option<String>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Export the common entries of a lexicon to CSV
    ExportData {
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        output_file: PathBuf,
    },

    /// Export the entries of a diatopic variation to CSV
    ExportVariation {
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        variation: String,

        output_file: PathBuf,
    },

    /// Export id, slug and term of every word to terms-<code>-<date>.csv
    ExportTerms {
        #[arg(value_parser = parse_lexicon_code)]
        lexicon: LexiconCode,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Create a lexicon
    CreateLexicon {
        name: String,
        /// Source language ISO 639 code
        src_language: String,
        /// Destination language ISO 639 code
        dst_language: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Create a region
    CreateRegion { name: String },

    /// Create a diatopic variation in an existing region
    CreateVariation {
        name: String,
        abbreviation: String,
        region: String,
    },

    /// Show database statistics
    Stats,

    /// Generate shell completions for linguatec-lexicon
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// linguatec-lexicon - bilingual dictionary service
///
/// Serves the dictionary over a REST API and maintains it from spreadsheets.
#[derive(Parser, Debug)]
#[command(name = "linguatec-lexicon")]
#[command(version)]
#[command(about = "Bilingual dictionary REST API and import/export tooling")]
#[command(long_about = "linguatec-lexicon serves a bilingual dictionary over HTTP and keeps it up to date from spreadsheets.

EXAMPLES:
    linguatec-lexicon create-lexicon es-ar es ar           # Create the es-ar lexicon
    linguatec-lexicon import-gramcat gramcat.csv           # Load grammatical categories
    linguatec-lexicon import-data es-ar data.xlsx          # Import bilingual entries
    linguatec-lexicon import-data --dry-run es-ar data.xlsx
    linguatec-lexicon export-data es-ar backup.csv         # Export common entries
    linguatec-lexicon serve --port 8080                    # Serve the REST API
    linguatec-lexicon completions bash > lexicon.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

IMPORTS:
    Imports are all-or-nothing: a single row error rolls the whole batch back.
    Row errors are printed to stdout as JSON lines.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// SQLite database file (overrides config)
    #[arg(short, long, env = "LEXICON_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

fn parse_lexicon_code(value: &str) -> Result<LexiconCode, String> {
    value.parse().map_err(|e: linguatec_lexicon::LexiconError| e.to_string())
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                marker,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "linguatec-lexicon", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level.into();
    }
    if let Some(database) = &cli.database {
        config.database.path = Some(database.clone());
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    run_command(cli.command, config).await
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    if let Commands::Serve { host, port } = &command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    let controller = Controller::with_config(config)?;

    match command {
        Commands::Serve { .. } => controller.serve().await?,

        Commands::ImportData {
            lexicon,
            input_file,
            dry_run,
            allow_partial,
        } => {
            let options = DataImportOptions {
                lexicon_code: lexicon,
                dry_run,
                allow_partial,
            };
            finish_import(controller.import_data(&input_file, &options)?)?;
        }

        Commands::ImportMono {
            lexicon,
            input_file,
            truncate,
            etimol_rich_text,
            dry_run,
        } => {
            let options = MonoImportOptions {
                lexicon_code: lexicon,
                truncate,
                dry_run,
            };
            finish_import(controller.import_mono(&input_file, &options, etimol_rich_text)?)?;
        }

        Commands::ImportGramcat { input_file, purge } => {
            finish_import(controller.import_gramcat(&input_file, purge)?)?;
        }

        Commands::ImportVariation {
            lexicon,
            input_file,
            variation,
            dry_run,
        } => {
            let options = VariationImportOptions {
                lexicon_code: lexicon,
                variation,
                dry_run,
            };
            finish_import(controller.import_variation(&input_file, &options)?)?;
        }

        Commands::ExportData { lexicon, output_file } => {
            let lines = controller.export_data(&lexicon, &output_file)?;
            info!("Success: {} entries written to {:?}", lines, output_file);
        }

        Commands::ExportVariation {
            lexicon,
            variation,
            output_file,
        } => {
            let lines = controller.export_variation(&lexicon, &variation, &output_file)?;
            info!("Success: {} entries written to {:?}", lines, output_file);
        }

        Commands::ExportTerms { lexicon, output_dir } => {
            let path = controller.export_terms(&lexicon, &output_dir)?;
            info!("Success: {:?}", path);
        }

        Commands::CreateLexicon {
            name,
            src_language,
            dst_language,
            description,
        } => {
            let code = parse_lexicon_code(&format!("{}-{}", src_language, dst_language))
                .map_err(|e| anyhow!(e))?;
            controller.create_lexicon(&name, &code, &description)?;
        }

        Commands::CreateRegion { name } => {
            controller.create_region(&name)?;
        }

        Commands::CreateVariation {
            name,
            abbreviation,
            region,
        } => {
            controller.create_variation(&name, &abbreviation, &region)?;
        }

        Commands::Stats => {
            println!("{}", controller.stats()?);
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Print row errors as JSON lines; a rejected real import is a failure
fn finish_import(report: ImportReport) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in report.error_json_lines() {
        writeln!(out, "{}", line)?;
    }

    if report.is_valid() {
        if report.committed {
            info!("Success: {} words, {} entries imported", report.words, report.entries);
        }
        Ok(())
    } else if report.dry_run {
        error!("Validation found {} row(s) with errors", report.errors.len());
        Ok(())
    } else {
        Err(linguatec_lexicon::ImportError::Rejected(report.errors.len()).into())
    }
}
