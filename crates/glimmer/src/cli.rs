use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glimmer")]
#[command(author, version, about)]
#[command(long_about = "A colour-adaptive photo slideshow for greeting decks.\n\n\
    Point it at a folder of photos, or a YAML deck with captions, and every\n\
    slide is themed with a colour sampled from its photo.\n\n\
    Examples:\n  \
    glimmer ./photos              Present a folder (fullscreen)\n  \
    glimmer deck.yaml --windowed  Present a deck file in a window\n  \
    glimmer palette ./photos      Print the sampled colour of every slide")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Photo directory or YAML deck file to present
    pub deck: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Auto-advance period in milliseconds
    #[arg(long, global = false)]
    pub interval: Option<u64>,

    /// Start with auto-advance paused
    #[arg(long, global = false)]
    pub no_autoplay: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sample every slide's colour and print the resulting palette
    Palette {
        /// Photo directory or YAML deck file
        deck: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.interval_ms, defaults.theme_color)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Options for presenting a deck, after CLI flags are collected.
#[derive(Debug, Clone, Default)]
pub struct PresentOptions {
    pub windowed: bool,
    pub start_slide: Option<usize>,
    pub interval_ms: Option<u64>,
    pub no_autoplay: bool,
}

impl Cli {
    /// Log level implied by `-v`/`-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Palette { deck, json }) => {
                if !deck.exists() {
                    anyhow::bail!("Deck not found: {}", deck.display());
                }
                crate::commands::palette::run(&deck, json)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("glimmer {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(deck) = self.deck {
                    if !deck.exists() {
                        anyhow::bail!("Deck not found: {}", deck.display());
                    }
                    let options = PresentOptions {
                        windowed: self.windowed,
                        start_slide: self.slide,
                        interval_ms: self.interval,
                        no_autoplay: self.no_autoplay,
                    };
                    crate::app::run(deck, options)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
