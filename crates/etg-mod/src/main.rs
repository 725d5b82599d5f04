use camino::Utf8PathBuf;
use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    check_ids, resolve_path, show_config, show_frames, show_map, FramesArgs, IdsArgs, MapArgs,
    ResolveArgs,
};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an etg-mod.toml configuration file
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Log every mapping and rescan
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the assets a mod source maps into the overlay
    Map {
        /// A resources directory or a .zip mod archive
        #[arg(short, long)]
        source: Utf8PathBuf,

        /// Also list directory markers
        #[arg(long)]
        dirs: bool,
    },
    /// Show what a logical asset path resolves to
    Resolve {
        /// A resources directory or a .zip mod archive
        #[arg(short, long)]
        source: Utf8PathBuf,

        /// The logical asset path, e.g. sprites/hero/hero_idle_0
        #[arg(short, long)]
        path: String,

        /// Let directory markers match
        #[arg(long)]
        dirs: bool,
    },
    /// Build a sprite group and show its animation sequences
    Frames {
        /// A resources directory or a .zip mod archive
        #[arg(short, long)]
        source: Utf8PathBuf,

        /// The sprite group, i.e. the folder below sprites/
        #[arg(short, long)]
        collection: String,

        /// Only show sequences for this base name
        #[arg(short, long)]
        base: Option<String>,

        /// Only show sequences for this animation phase
        #[arg(long)]
        phase: Option<String>,
    },
    /// Register the ids of a JSON file and report rejected ones
    Ids {
        /// JSON object mapping ids to labels
        #[arg(short, long)]
        file: Utf8PathBuf,

        /// Lock a namespace before registering
        #[arg(long)]
        lock: Vec<String>,
    },
    /// Show the effective configuration
    Config,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "etg_mod=debug,etg_assets=debug,etg_ids=debug"
    } else {
        "etg_mod=info,etg_assets=info,etg_ids=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    let effective = utils::config::load_config(args.config.as_deref())?;

    match args.command {
        Commands::Map { source, dirs } => show_map(MapArgs { source, dirs }, effective.config),
        Commands::Resolve { source, path, dirs } => {
            resolve_path(ResolveArgs { source, path, dirs }, effective.config)
        }
        Commands::Frames {
            source,
            collection,
            base,
            phase,
        } => show_frames(
            FramesArgs {
                source,
                collection,
                base,
                phase,
            },
            effective.config,
        ),
        Commands::Ids { file, lock } => check_ids(IdsArgs { file, lock }),
        Commands::Config => show_config(&effective),
    }
}
