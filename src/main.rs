//! Command-line entry point for the string table generator.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    ValueEnum,
};
use lang_table_gen::config::ConfigManager;
use lang_table_gen::emit::OutputFormat;
use lang_table_gen::{
    GenerateError,
    Generator,
    OutputPaths,
    Summary,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lang-table-gen")]
#[command(version)]
#[command(about = "Compile translation documents into indexed, deduplicated string tables")]
struct Cli {
    /// Data artifact to write (`.c` source, or the JSON document)
    #[arg(value_name = "DATA_OUT")]
    data: PathBuf,

    /// Declarations artifact to write (`.h` header, required for C)
    #[arg(value_name = "DECL_OUT")]
    declarations: Option<PathBuf>,

    /// Workspace root that translation file patterns are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to `.lang-table.json` in the root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the default language tag
    #[arg(long, value_name = "TAG")]
    default_language: Option<String>,

    /// Reject unrecognized lines in translation documents
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "c")]
    format: FormatArg,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    C,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::C => Self::C,
            FormatArg::Json => Self::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                keys = summary.keys,
                strings = summary.strings,
                languages = %summary.languages.join(","),
                written = summary.written.len(),
                "Generation finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: &Cli) -> Result<Summary, GenerateError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(&cli.root, cli.config.as_deref())?;

    let mut settings = config_manager.get_settings().clone();
    if let Some(language) = &cli.default_language {
        settings.default_language.clone_from(language);
    }
    settings.strict_lines |= cli.strict;
    config_manager.update_settings(settings)?;

    let generator = Generator::new(cli.root.clone(), config_manager.get_settings().clone());

    let outputs = OutputPaths { data: cli.data.clone(), declarations: cli.declarations.clone() };
    generator.run(cli.format.into(), &outputs)
}
