//! Command line entry point: replays an action script and saves exports.

use clap::Parser;
use folio_app::{ActionOutcome, AppConfig, AppResult, Session, UiAction};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Replay a Folio action script and export the pages as PDF")]
struct Args {
    /// JSON file containing the list of actions to replay
    script: PathBuf,

    /// Where to save downloaded documents (defaults to the configured filename)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the final canvas state as JSON
    #[arg(long)]
    print_state: bool,
}

async fn run(args: Args) -> AppResult<()> {
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let script = std::fs::read_to_string(&args.script)?;
    let actions: Vec<UiAction> = serde_json::from_str(&script)?;
    log::info!("Replaying {} actions from {}", actions.len(), args.script.display());

    let mut session = Session::new(&config)?;
    for action in actions {
        if let ActionOutcome::Exported(document) = session.dispatch(action).await? {
            let target = args
                .output
                .clone()
                .unwrap_or_else(|| Path::new(&document.filename).to_path_buf());
            let path = document.write_to(&target)?;
            println!("{}", path.display());
        }
    }

    if args.print_state {
        println!("{}", session.canvas().to_json()?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Folio");

    let args = Args::parse();
    match pollster::block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("folio: {}", err);
            ExitCode::FAILURE
        }
    }
}
