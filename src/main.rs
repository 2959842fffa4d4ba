//! etab - headless shell around the etab spreadsheet core.
//!
//! Loads an optional `.etab` file, applies edits and history actions in the
//! order given on the command line, then prints the grid or saves it.

mod logger;

use anyhow::{Context, bail};
use directories::ProjectDirs;
use etab_core::storage::write_etab_content;
use etab_core::{CellRef, Document, EditOutcome, EngineConfig, RecalcStrategy};
use std::env;
use std::path::{Path, PathBuf};

fn print_usage() {
    eprintln!("Usage: etab [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.etab)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>       Load engine settings from a TOML file");
    eprintln!("  --no-config               Ignore the default config file");
    eprintln!("  --recalc <MODE>           Recalculation strategy: sweep or reactive");
    eprintln!("  -s, --set <REF=TEXT>      Edit a cell (can be repeated)");
    eprintln!("  -u, --undo                Undo the last edit");
    eprintln!("  -r, --redo                Redo the last undone edit");
    eprintln!("  --currency <SYMBOL>       Change the currency symbol");
    eprintln!("  --format-currency <REF>   Rewrite a numeric cell as currency");
    eprintln!("  --recompute               Re-evaluate every formula");
    eprintln!("  --add-row                 Append an empty row");
    eprintln!("  --add-column              Append an empty column");
    eprintln!("  -o, --output <FILE>       Save to a file instead of printing");
    eprintln!("  -v, --verbose             Log engine activity to stderr");
    eprintln!("  -h, --help                Print help");
}

/// A document action, applied in command-line order.
#[derive(Debug)]
enum Action {
    Set(CellRef, String),
    Undo,
    Redo,
    Currency(String),
    FormatCurrency(CellRef),
    Recompute,
    AddRow,
    AddColumn,
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    no_config: bool,
    recalc: Option<RecalcStrategy>,
    output_file: Option<PathBuf>,
    verbose: bool,
    actions: Vec<Action>,
}

fn required_value(args: &[String], i: usize, what: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires {}", args[i - 1], what);
            std::process::exit(1);
        }
    }
}

fn parse_cell(text: &str) -> CellRef {
    match text.parse::<CellRef>() {
        Ok(cell_ref) => cell_ref,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                options.config_file = Some(PathBuf::from(required_value(args, i, "a file path")));
            }
            "--no-config" => options.no_config = true,
            "--recalc" => {
                i += 1;
                options.recalc = match required_value(args, i, "a mode").as_str() {
                    "sweep" => Some(RecalcStrategy::Sweep),
                    "reactive" => Some(RecalcStrategy::Reactive),
                    other => {
                        eprintln!("Error: Unknown recalc mode: {}", other);
                        std::process::exit(1);
                    }
                };
            }
            "-s" | "--set" => {
                i += 1;
                let assignment = required_value(args, i, "REF=TEXT");
                let Some((name, text)) = assignment.split_once('=') else {
                    eprintln!("Error: Expected REF=TEXT, got {}", assignment);
                    std::process::exit(1);
                };
                options
                    .actions
                    .push(Action::Set(parse_cell(name.trim()), text.to_string()));
            }
            "-u" | "--undo" => options.actions.push(Action::Undo),
            "-r" | "--redo" => options.actions.push(Action::Redo),
            "--currency" => {
                i += 1;
                options
                    .actions
                    .push(Action::Currency(required_value(args, i, "a symbol")));
            }
            "--format-currency" => {
                i += 1;
                let name = required_value(args, i, "a cell reference");
                options.actions.push(Action::FormatCurrency(parse_cell(&name)));
            }
            "--recompute" => options.actions.push(Action::Recompute),
            "--add-row" => options.actions.push(Action::AddRow),
            "--add-column" => options.actions.push(Action::AddColumn),
            "-o" | "--output" => {
                i += 1;
                options.output_file = Some(PathBuf::from(required_value(args, i, "a file path")));
            }
            "-v" | "--verbose" => options.verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.file_path.is_none() {
                    options.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    options
}

/// Settings from `--config`, else `config.toml` in the platform config dir, else defaults.
fn load_config(options: &Options) -> anyhow::Result<EngineConfig> {
    if let Some(path) = &options.config_file {
        return EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }
    if options.no_config {
        return Ok(EngineConfig::default());
    }
    let Some(proj) = ProjectDirs::from("", "", "etab") else {
        return Ok(EngineConfig::default());
    };
    let path = proj.config_dir().join("config.toml");
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    log::debug!("using config {}", path.display());
    EngineConfig::load(&path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn apply(doc: &mut Document, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Set(cell_ref, text) => {
            if let EditOutcome::Failed(err) = doc.set_cell_text(cell_ref, &text) {
                eprintln!("Warning: {}: {}", cell_ref, err);
            }
        }
        Action::Undo => {
            if let Err(e) = doc.undo() {
                eprintln!("Warning: {}", e);
            }
        }
        Action::Redo => {
            if let Err(e) = doc.redo() {
                eprintln!("Warning: {}", e);
            }
        }
        Action::Currency(symbol) => doc.set_currency_symbol(&symbol),
        Action::FormatCurrency(cell_ref) => {
            doc.format_currency_at(cell_ref)
                .with_context(|| format!("Cannot format {}", cell_ref))?;
        }
        Action::Recompute => {
            doc.recompute_all();
        }
        Action::AddRow => doc.add_row(),
        Action::AddColumn => doc.add_column(),
    }
    Ok(())
}

fn run(options: Options) -> anyhow::Result<()> {
    let mut config = load_config(&options)?;
    if let Some(recalc) = options.recalc {
        config.recalc = recalc;
    }

    let mut doc = Document::with_file(options.file_path.as_deref(), config)
        .context("Failed to open spreadsheet")?;

    for action in options.actions {
        apply(&mut doc, action)?;
    }

    match options.output_file {
        Some(path) => {
            save(&mut doc, &path)?;
            println!("Saved to {}", path.display());
        }
        None => print!("{}", write_etab_content(doc.grid())),
    }
    Ok(())
}

fn save(doc: &mut Document, path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!("{} is a directory", path.display());
    }
    doc.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    if options.verbose {
        logger::init();
    }

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
