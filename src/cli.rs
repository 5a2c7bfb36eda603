use clap::{Parser, Subcommand};

/// Cloud migration service: datasource migration and GCOM token rotation
#[derive(Parser)]
#[command(name = "cloudmigration", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind (defaults to CLOUDMIGRATION_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Rotate the GCOM access policy and print a fresh migration token
    Token,

    /// Migrate datasources to the cloud stack
    Migrate {
        /// Also migrate private datasource connect (PDC) settings
        #[arg(long)]
        to_pdc: bool,
        /// Also migrate stored credentials
        #[arg(long)]
        credentials: bool,
    },
}
