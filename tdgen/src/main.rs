//! Affordance classifier and Thing Description generator.
//!
//! Loads a device's flat affordance document, replays an optional
//! reclassification plan, and prints or writes the resulting WoT Thing
//! Description.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use tdgen::core::types::StoreError;
use tdgen::exit_codes;
use tdgen::io::config::{CONFIG_FILE, GeneratorConfig, load_config, write_config};
use tdgen::io::ingest::{render_affordances, write_affordances};
use tdgen::io::output::write_document;
use tdgen::logging;
use tdgen::session::Session;

#[derive(Parser)]
#[command(
    name = "tdgen",
    version,
    about = "Classify device affordances and produce a WoT Thing Description"
)]
struct Cli {
    /// Generator config file.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check an affordance document against the schema and invariants.
    Validate { input: PathBuf },
    /// Print every selectable affordance, after applying an optional plan.
    List {
        input: PathBuf,
        #[arg(long)]
        plan: Option<PathBuf>,
    },
    /// Synthesize the Thing Description.
    Produce {
        input: PathBuf,
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Document title (defaults to the configured title).
        #[arg(long)]
        title: Option<String>,
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Write the reclassified collection back in the ingestion shape.
    Export {
        input: PathBuf,
        #[arg(long)]
        plan: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Write a default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;
    match cli.command {
        Command::InitConfig { force } => cmd_init_config(&config, force),
        Command::Validate { input } => cmd_validate(&input, &load_config(&config)?),
        Command::List { input, plan } => {
            cmd_list(&input, plan.as_deref(), &load_config(&config)?)
        }
        Command::Produce {
            input,
            plan,
            title,
            pretty,
            out,
        } => {
            let cfg = load_config(&config)?;
            let title = title.unwrap_or_else(|| cfg.title.clone());
            let pretty = pretty || cfg.pretty;
            cmd_produce(&input, plan.as_deref(), &title, pretty, out.as_deref(), &cfg)
        }
        Command::Export { input, plan, out } => {
            cmd_export(&input, &plan, out.as_deref(), &load_config(&config)?)
        }
    }
}

/// Selection failures get their own code; everything else is invalid input.
fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<StoreError>()) {
        exit_codes::SELECTION
    } else {
        exit_codes::INVALID
    }
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &GeneratorConfig::default())?;
    info!(path = %path.display(), "wrote config");
    Ok(())
}

fn cmd_validate(input: &Path, cfg: &GeneratorConfig) -> Result<()> {
    let session = Session::open(input, None, cfg)?;
    let store = session.store();
    println!(
        "ok: {} properties, {} actions, {} events",
        store.properties().len(),
        store.actions().len(),
        store.events().len()
    );
    Ok(())
}

fn cmd_list(input: &Path, plan: Option<&Path>, cfg: &GeneratorConfig) -> Result<()> {
    let session = Session::open(input, plan, cfg)?;
    for row in session.overview() {
        println!("{}", row);
    }
    Ok(())
}

fn cmd_produce(
    input: &Path,
    plan: Option<&Path>,
    title: &str,
    pretty: bool,
    out: Option<&Path>,
    cfg: &GeneratorConfig,
) -> Result<()> {
    let mut session = Session::open(input, plan, cfg)?;
    let produced = session.produce(title, pretty)?;
    match out {
        Some(path) => write_document(path, &produced.serialized)?,
        None => println!("{}", produced.serialized),
    }
    Ok(())
}

fn cmd_export(input: &Path, plan: &Path, out: Option<&Path>, cfg: &GeneratorConfig) -> Result<()> {
    let session = Session::open(input, Some(plan), cfg)?;
    let affordances = session.store().export();
    match out {
        Some(path) => write_affordances(path, &affordances)?,
        None => print!("{}", render_affordances(&affordances)?),
    }
    Ok(())
}
