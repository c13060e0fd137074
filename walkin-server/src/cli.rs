use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "walkin",
    about = "Walk-in Queue - service queue daemon and operator tools",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "WALKIN_CONFIG", help = "Path to JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the queue server (default if no command specified)")]
    Serve {
        #[arg(short, long, help = "Override server.port")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Check database connectivity and print server time")]
    DbCheck,

    #[command(subcommand, about = "Manage sales representatives")]
    Rep(RepCommands),

    #[command(subcommand, about = "Inspect the customer queue")]
    Customers(CustomerCommands),
}

#[derive(Subcommand)]
pub enum RepCommands {
    #[command(about = "Provision a representative for an identity")]
    Add {
        #[arg(help = "Identity (credential subject) of the representative")]
        identity: String,

        #[arg(short, long, help = "Display name")]
        name: Option<String>,
    },

    #[command(about = "List all representatives")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Zero a representative's counters and mark available")]
    Reset {
        #[arg(help = "Identity of the representative")]
        identity: String,
    },
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    #[command(about = "List customers, helped last")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}
