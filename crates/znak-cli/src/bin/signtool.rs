use std::path::PathBuf;

use clap::{Parser, Subcommand};

use znak_cli::commands::search_ops::SearchQuery;
use znak_cli::commands::{catalogue_ops, config_ops, search_ops, word_ops};
use znak_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "signtool", about = "Czech Sign Language dictionary search tool")]
struct Cli {
    /// Catalogue: a SQLite dictionary or a compiled snapshot (auto-detected)
    #[arg(long, global = true, default_value = "dictionary.db")]
    db: PathBuf,
    /// Directory holding the sign videos
    #[arg(long, global = true)]
    videos: Option<PathBuf>,
    /// Custom settings TOML (see settings-export)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Write JSON trace lines to this directory
    #[arg(long, global = true)]
    trace_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank catalogue signs against a sketched sign
    Search {
        /// Active handshape id (1-54), up to twice
        #[arg(long = "shape")]
        shapes: Vec<u8>,
        /// Sign type: 'single hand', 'both the same' or 'passive hand'
        #[arg(long = "type", default_value = "single hand")]
        sign_type: String,
        /// Passive handshape id, for 'passive hand' signs
        #[arg(long)]
        passive: Option<u8>,
        /// Placement ellipse as cx,cy,a,b,angle
        #[arg(long)]
        ellipse: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up a word (exact, case-insensitive)
    Lookup {
        /// Word to look up
        word: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List all words in dictionary order
    Words,
    /// Compile a catalogue into a snapshot with pre-rasterized placements
    Compile {
        /// Source catalogue (SQLite or snapshot)
        input: PathBuf,
        /// Output snapshot file
        output: PathBuf,
    },
    /// Print the run-length encoding of a placement ellipse
    Rasterize {
        /// Ellipse as cx,cy,a,b,angle
        ellipse: String,
        /// Print this many outline points instead
        #[arg(long)]
        outline: Option<usize>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _trace_guard = init_tracing(cli.trace_dir.as_deref());
    if let Some(file) = &cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::Search {
            shapes,
            sign_type,
            passive,
            ellipse,
            json,
        } => {
            let query = SearchQuery {
                shapes,
                sign_type,
                passive,
                ellipse,
            };
            search_ops::search(&cli.db, cli.videos.as_deref(), &query, json);
        }
        Command::Lookup { word, json } => {
            word_ops::lookup(&cli.db, cli.videos.as_deref(), &word, json);
        }
        Command::Words => word_ops::words(&cli.db),
        Command::Compile { input, output } => catalogue_ops::compile(&input, &output),
        Command::Rasterize { ellipse, outline } => {
            catalogue_ops::rasterize_cmd(&ellipse, outline);
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
