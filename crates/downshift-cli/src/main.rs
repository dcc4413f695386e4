//! Command-line front end. Runs batches and manages saved profiles.

use clap::{Args, Parser, Subcommand};
use spectradownshift::batch::{BatchError, LAST_INPUT_PATH, LAST_OUTPUT_PATH};
use spectradownshift::{
    collect_inputs, AudioFormat, BackendRegistry, BatchEvent, BatchHandle, Engine, JobSettings,
    Mode, Profile, ProfileStore, Result,
};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "spectradownshift",
    version,
    about = "Reversible spectral downshift for half-speed production"
)]
struct Cli {
    /// Profile store (created with defaults if missing)
    #[arg(long, global = true, default_value = "profiles.json")]
    profiles: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prepare or restore a file or a folder of files
    Run(RunArgs),
    /// List, save or delete profiles
    #[command(subcommand)]
    Profiles(ProfilesCommand),
    /// List the resampler engines available in this build
    Engines,
}

#[derive(Args)]
struct RunArgs {
    /// prepare or restore
    #[arg(long)]
    mode: Mode,
    /// Input file, or folder with --folder (defaults to the last one used)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Existing output folder (defaults to the last one used)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Treat the input as a folder of .wav/.flac files
    #[arg(long)]
    folder: bool,
    /// Start from a saved profile
    #[arg(long)]
    profile: Option<String>,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Args)]
struct Overrides {
    /// Cutoff in Hz
    #[arg(long)]
    cutoff: Option<f64>,
    /// precision or fast
    #[arg(long)]
    resampler: Option<Engine>,
    /// wav or flac
    #[arg(long)]
    format: Option<AudioFormat>,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    List,
    /// Save a profile, starting from the existing one of the same name
    Save {
        name: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    Delete {
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => run(args, cli.profiles),
        Command::Profiles(cmd) => profiles(cmd, cli.profiles),
        Command::Engines => {
            let registry = BackendRegistry::detect();
            for engine in Engine::ALL {
                let status = if registry.is_available(engine) {
                    "available"
                } else {
                    "not built"
                };
                println!("{:<10} {}", engine.name(), status);
            }
            Ok(())
        }
    }
}

fn run(args: RunArgs, store_path: PathBuf) -> Result<()> {
    let mut store = ProfileStore::open(&store_path)?;

    let input = args
        .input
        .or_else(|| store.app_setting(LAST_INPUT_PATH).map(PathBuf::from))
        .ok_or_else(|| BatchError::InvalidSettings("no input given".into()))?;
    let output = args
        .output
        .or_else(|| store.app_setting(LAST_OUTPUT_PATH).map(PathBuf::from))
        .ok_or_else(|| BatchError::InvalidSettings("no output folder given".into()))?;

    let mut settings = JobSettings::new(args.mode, &output);
    if let Some(name) = &args.profile {
        let profile = store
            .profile(name)
            .ok_or_else(|| BatchError::InvalidSettings(format!("no profile named '{}'", name)))?;
        settings = settings.with_profile(profile);
    }
    if let Some(cutoff) = args.overrides.cutoff {
        settings = settings.with_cutoff(cutoff);
    }
    if let Some(engine) = args.overrides.resampler {
        settings = settings.with_engine(engine);
    }
    if let Some(format) = args.overrides.format {
        settings = settings.with_format(format);
    }

    let inputs = collect_inputs(&input, args.folder)?;
    settings.validate()?;

    store.save_app_setting(LAST_INPUT_PATH, input.to_string_lossy())?;
    store.save_app_setting(LAST_OUTPUT_PATH, output.to_string_lossy())?;

    info!(
        "{} {} file(s): engine {}, cutoff {} Hz, {} output",
        settings.mode,
        inputs.len(),
        settings.engine,
        settings.cutoff,
        settings.output.format
    );

    let handle = BatchHandle::start(inputs, settings)?;
    loop {
        let done = handle.is_done();
        for event in handle.poll() {
            report(&event);
        }
        if done {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    let result = handle.wait()?;
    if result.stopped {
        println!("Stopped after {} file(s)", result.written.len());
    }
    Ok(())
}

fn report(event: &BatchEvent) {
    match event {
        BatchEvent::Started { index, total, path } => {
            println!("[{}/{}] {}", index + 1, total, path.display());
        }
        BatchEvent::Saved { path } => println!("  saved {}", path.display()),
        BatchEvent::Failed { path, error } => {
            eprintln!("  failed {}: {}", path.display(), error);
        }
        BatchEvent::Stopped => println!("Processing stopped"),
        BatchEvent::Finished => println!("All tasks finished"),
    }
}

fn profiles(cmd: ProfilesCommand, store_path: PathBuf) -> Result<()> {
    let mut store = ProfileStore::open(&store_path)?;

    match cmd {
        ProfilesCommand::List => {
            for (name, profile) in store.profiles() {
                println!(
                    "{:<20} {:<10} {:<5} {} Hz",
                    name,
                    profile.resampler.name(),
                    profile.output_format.extension(),
                    profile.cutoff
                );
            }
        }
        ProfilesCommand::Save { name, overrides } => {
            let mut profile: Profile = store.profile(&name).copied().unwrap_or_default();
            if let Some(cutoff) = overrides.cutoff {
                if !(cutoff.is_finite() && cutoff > 0.0) {
                    return Err(spectradownshift::core::Error::InvalidCutoff(cutoff).into());
                }
                profile.cutoff = cutoff;
            }
            if let Some(engine) = overrides.resampler {
                profile.resampler = engine;
            }
            if let Some(format) = overrides.format {
                profile.output_format = format;
            }
            store.save_profile(&name, profile)?;
            println!("Profile '{}' saved", name);
        }
        ProfilesCommand::Delete { name } => {
            if store.delete_profile(&name)? {
                println!("Profile '{}' deleted", name);
            } else {
                println!("No profile named '{}'", name);
            }
        }
    }

    Ok(())
}
