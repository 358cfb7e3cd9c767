use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{news, predict, serve};

#[derive(Parser)]
#[command(name = "stockscope")]
#[command(about = "Stock dashboard service with market data, news and price predictions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server, overriding the configured one
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "STOCKSCOPE_BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Fetch predictions for one symbol and print the merged series
    ///
    /// Examples:
    ///   stockscope predict --symbol RELIANCE
    ///   stockscope predict --symbol TCS --days 3 --start-date 2024-03-01
    Predict {
        /// Ticker symbol
        #[arg(short, long)]
        symbol: String,

        /// Forecast horizon in days (1-5)
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=5))]
        days: u32,

        /// First day of the displayed window (YYYY-MM-DD, default: 2024-01-01)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last day of the displayed window (YYYY-MM-DD, default: today)
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// Print the landing page news feed
    News,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind_address } => {
                serve(bind_address.as_deref()).await?;
            }
            Commands::Predict {
                symbol,
                days,
                start_date,
                end_date,
            } => {
                predict(&symbol, days, start_date, end_date).await?;
            }
            Commands::News => {
                news().await?;
            }
        }
        Ok(())
    }
}
