//! System I gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client (JSON over HTTP)
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────┐   ┌──────────────┐   ┌───────────┐
//!   │   http   │──▶│ security │──▶│  operations  │──▶│  gateway  │
//!   │  server  │   │ api keys │   │ encode/decode│   │           │
//!   └──────────┘   └──────────┘   └──────────────┘   └─────┬─────┘
//!                                                          │
//!          ┌─────────────┬────────────────┬────────────────┤
//!          ▼             ▼                ▼                ▼
//!    ┌──────────┐  ┌───────────┐   ┌────────────┐   ┌───────────┐
//!    │ routing  │  │   codec   │   │    net     │   │   error   │
//!    │ + random │  │ header,   │   │ TCP, frame │   │ classify  │
//!    │  ports   │  │ TIS-620   │   │ timeouts   │   │           │
//!    └──────────┘  └───────────┘   └─────┬──────┘   └───────────┘
//!                                        │
//!                                        ▼
//!                                    System I
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "systemi-gateway", version, about = "JSON to System I TCP gateway")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "SYSTEMI_GATEWAY_CONFIG", default_value = "config/gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    systemi_gateway::lifecycle::run(&cli.config).await?;
    Ok(())
}
