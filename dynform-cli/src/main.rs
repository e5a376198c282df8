use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dynform::{
    Catalog, FileStore, FormUI, KeyValueStore, MemoryStore, UiOptions,
    io::{DocumentFormat, OutputDestination, OutputOptions, emit},
    storage::Persistence,
};

const DEFAULT_STORE_DIR: &str = ".dynform";
const LOG_ENV: &str = "DYNFORM_LOG";
const DEFAULT_TICK_MS: u64 = 250;

#[derive(Debug, Parser)]
#[command(
    name = "dynform",
    version,
    about = "Fill in category-driven forms and keep the entries on disk"
)]
struct Cli {
    /// Directory holding the stored entries
    #[arg(long = "store-dir", value_name = "DIR", default_value = DEFAULT_STORE_DIR)]
    store_dir: PathBuf,

    /// Catalog file (category -> field list) replacing the built-in forms
    #[arg(long = "catalog", value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Form type selected on start
    #[arg(long = "category", value_name = "NAME")]
    category: Option<String>,

    /// Keep entries in memory only; nothing is read from or written to disk
    #[arg(long = "ephemeral")]
    ephemeral: bool,

    /// Print the stored entries and exit ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "export", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    exports: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite export files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Title shown when no form type is selected
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Write diagnostics to this file (filter with DYNFORM_LOG, default "warn")
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Quit immediately even when the form holds unsubmitted input
    #[arg(long = "no-confirm-exit")]
    no_confirm_exit: bool,

    /// Hide the key binding line in the footer
    #[arg(long = "no-help")]
    no_help: bool,

    /// Milliseconds to wait for input between redraws
    #[arg(long = "tick-rate", value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    tick_rate_ms: u64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_tracing(path)?;
    }

    let catalog = load_catalog(cli.catalog.as_deref())?;
    if let Some(category) = cli.category.as_deref()
        && !catalog.contains(category)
    {
        return Err(eyre!(
            "unknown form type '{category}'; expected one of: {}",
            catalog.names().collect::<Vec<_>>().join(", ")
        ));
    }

    if !cli.exports.is_empty() {
        let mut diagnostics = DiagnosticCollector::default();
        let options = build_export_options(&cli, &mut diagnostics);
        diagnostics.into_result()?;
        return match options {
            Some(options) => export_records(&cli, &options),
            None => Ok(()),
        };
    }

    let options = ui_options(&cli);

    if cli.ephemeral {
        run_ui(catalog, MemoryStore::new(), options)
    } else {
        run_ui(catalog, FileStore::new(&cli.store_dir), options)
    }
}

fn ui_options(cli: &Cli) -> UiOptions {
    let mut options = UiOptions::default()
        .with_confirm_exit(!cli.no_confirm_exit)
        .with_help(!cli.no_help)
        .with_tick_rate(Duration::from_millis(cli.tick_rate_ms.max(1)));
    if let Some(category) = cli.category.as_ref() {
        options = options.with_initial_category(category.clone());
    }
    if let Some(title) = cli.title.as_ref() {
        options = options.with_title(title.clone());
    }
    options
}

fn run_ui<S: KeyValueStore>(catalog: Catalog, backend: S, options: UiOptions) -> Result<()> {
    let store = FormUI::new(catalog, backend)
        .with_options(options)
        .run()
        .map_err(Report::msg)?;
    info!(entries = store.total_records(), "session finished");
    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path)
            .wrap_err_with(|| format!("failed to load catalog from {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

fn export_records(cli: &Cli, options: &OutputOptions) -> Result<()> {
    let store = if cli.ephemeral {
        Persistence::new(MemoryStore::new()).load()
    } else {
        Persistence::new(FileStore::new(&cli.store_dir)).load()
    };
    emit(&store, options).map_err(Report::msg)
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_export_options(cli: &Cli, diagnostics: &mut DiagnosticCollector) -> Option<OutputOptions> {
    let mut destinations = Vec::new();
    for raw in &cli.exports {
        if raw.trim().is_empty() {
            diagnostics.push_output("export destination cannot be empty");
            continue;
        }
        destinations.push(OutputDestination::parse(raw));
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();
    ensure_paths_available(&file_paths, cli.force, diagnostics);

    let start = diagnostics.len();
    let format = if file_paths.is_empty() {
        DocumentFormat::default()
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };
    if diagnostics.len() > start || destinations.is_empty() {
        return None;
    }

    Some(
        OutputOptions::new(format)
            .with_pretty(!cli.no_pretty)
            .with_destinations(destinations),
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match probe_format_from_extension(path) {
            ExtensionFormat::Known(format) => {
                if let Some(existing) = detected {
                    if existing != format {
                        diagnostics.push_output(format!(
                            "export file {} uses {format} but other destinations use {existing}; align extensions",
                            path.display()
                        ));
                    }
                } else {
                    detected = Some(format);
                }
            }
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "export file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from export file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    if let Some(format) = DocumentFormat::from_extension(path) {
        return ExtensionFormat::Known(format);
    }
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    match ext.to_string_lossy().to_ascii_lowercase().as_str() {
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_paths_available(paths: &[PathBuf], force: bool, diagnostics: &mut DiagnosticCollector) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("dynform").chain(args.iter().copied()))
    }

    #[test]
    fn stdout_export_defaults_to_json() {
        let cli = cli(&["--export", "-"]);
        let mut diagnostics = DiagnosticCollector::default();
        let options = build_export_options(&cli, &mut diagnostics).expect("options");
        assert_eq!(diagnostics.len(), 0);
        assert_eq!(options.format, DocumentFormat::Json);
        assert_eq!(options.destinations, vec![OutputDestination::Stdout]);
        assert!(options.pretty);
    }

    #[test]
    fn unknown_export_extension_is_reported() {
        let cli = cli(&["--export", "entries.txt"]);
        let mut diagnostics = DiagnosticCollector::default();
        assert!(build_export_options(&cli, &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn ui_flags_map_onto_options() {
        let options = ui_options(&cli(&[
            "--tick-rate",
            "40",
            "--no-help",
            "--no-confirm-exit",
            "--category",
            "Payment Information",
        ]));
        assert_eq!(options.tick_rate, Duration::from_millis(40));
        assert!(!options.show_help);
        assert!(!options.confirm_exit);
        assert_eq!(options.initial_category.as_deref(), Some("Payment Information"));

        let defaults = ui_options(&cli(&[]));
        assert_eq!(defaults.tick_rate, Duration::from_millis(DEFAULT_TICK_MS));
        assert!(defaults.show_help);
    }

    #[test]
    fn store_dir_has_default() {
        let cli = cli(&[]);
        assert_eq!(cli.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
        assert!(!cli.ephemeral);
    }
}
