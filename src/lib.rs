use clap::Parser;

pub mod config;
pub mod monitor;
pub mod scheduler;
pub mod series;
pub mod theme;
pub mod ui;
pub mod upgrade;

#[derive(Parser)]
#[command(name = "scry")]
#[command(about = "A terminal-resident real-time activity monitor")]
#[command(version)]
pub struct Cli {
    /// Color theme to use [default: parallax]
    #[arg(short = 't', long = "theme", value_name = "NAME")]
    pub theme: Option<String>,

    /// Disables mouse interactivity
    #[arg(long = "no-mouse")]
    pub no_mouse: bool,

    /// Disables the upgrade notice, useful when logging
    #[arg(long = "no-upgrade")]
    pub no_upgrade: bool,

    /// Quits after this many seconds [default: 0 = disabled]
    #[arg(long = "quit-after", value_name = "SECONDS")]
    pub quit_after: Option<u64>,

    /// Milliseconds between redraws [default: 100]
    #[arg(long = "update-interval", value_name = "MILLISECONDS")]
    pub update_interval: Option<u64>,
}
