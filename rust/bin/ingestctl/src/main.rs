//! `ingestctl`: sample device client for the ingest server.
//!
//! Builds frames the way a sensor board does, signs them with the
//! device secret and posts them. Useful for vendor bring-up.

mod board;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ingest sample client.
#[derive(Parser, Debug)]
#[command(name = "ingestctl", about = "Ingest sample device client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send synthetic frames for a board type.
    Send {
        /// Server base URL (e.g. http://localhost:3000).
        base: String,
        /// Board type: rack-coolant-board | flow-board | voltage-board.
        board: String,
        /// Device id issued by the server.
        device_id: String,
        /// Device secret issued by the server.
        secret: String,
        /// Hardware serial number of this board.
        hardware_sn: String,
        /// Ingest path on the server.
        #[arg(long, default_value = "/v1/ingest")]
        path: String,
        /// Repeat every N seconds instead of sending once.
        #[arg(long, env = "PERIOD_SECS")]
        period: Option<u64>,
    },

    /// Print auth headers for a JSON body file.
    Sign {
        #[arg(long)]
        device_id: String,
        #[arg(long)]
        secret: String,
        /// Epoch milliseconds (default: now).
        #[arg(long)]
        timestamp: Option<i64>,
        /// File holding the exact body bytes.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            base,
            board,
            device_id,
            secret,
            hardware_sn,
            path,
            period,
        } => commands::send::send(&commands::send::SendArgs {
            base: &base,
            board: &board,
            device_id: &device_id,
            secret: &secret,
            hardware_sn: &hardware_sn,
            path: &path,
            period_secs: period,
        }),
        Commands::Sign {
            device_id,
            secret,
            timestamp,
            file,
        } => commands::sign::sign_file(&device_id, &secret, timestamp, &file),
    }
}
