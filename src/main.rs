use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::debug;

use api::{RatesClient, TasasQuery};
use calculator::Calculator;
use calendar::CalendarMonth;
use config::Config;

mod api;
mod app;
mod calculator;
mod calendar;
mod config;
mod dolar_ves;
mod exchange_rate;
mod format;
mod history;
mod widget;

#[derive(Parser)]
#[command(name = "monitor-vzla")]
#[command(about = "Tasas del dólar en Venezuela: BCV, Binance P2P y Euro", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the rates service (overrides MONITOR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's rates, or those of a past day
    Rates {
        /// Day to look up (YYYY-MM-DD)
        #[arg(short, long)]
        fecha: Option<NaiveDate>,

        /// Rates already announced for the next day
        #[arg(short, long, conflicts_with = "fecha")]
        next: bool,
    },

    /// Convert an amount with every rate
    Convert {
        /// Amount as typed, e.g. 100 or 1.234,50
        amount: String,

        /// Convert bolívares to dollars instead
        #[arg(long)]
        ves: bool,

        /// Use the rates of a past day (YYYY-MM-DD)
        #[arg(short, long)]
        fecha: Option<NaiveDate>,
    },

    /// Last 30 days with period metrics
    History,

    /// Days of a month with published rates
    Calendar {
        /// Month (1-12), defaults to the current one
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to the current one
        #[arg(short, long)]
        year: Option<i32>,

        /// Move this many months from the chosen one, e.g. -1 for the previous month
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,

        /// Show the rates of this day of the month
        #[arg(short, long)]
        day: Option<u32>,
    },

    /// Compact summary of the latest rates
    Widget,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }

    let client = RatesClient::new(&config)?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Rates { fecha, next } => {
            app::show_rates(&client, tasas_query(fecha, next)).await?;
        }
        Commands::Convert { amount, ves, fecha } => {
            let mut calculator = Calculator::default();
            if ves {
                calculator.toggle_direction();
            }
            calculator.type_text(&amount)?;
            debug!("Converting {} ({:?})", calculator.amount(), calculator.direction());
            app::convert(&client, &calculator, tasas_query(fecha, false)).await?;
        }
        Commands::History => {
            app::show_history(&client, today).await?;
        }
        Commands::Calendar {
            month,
            year,
            shift,
            day,
        } => {
            let current = CalendarMonth::containing(today);
            let month = CalendarMonth::new(
                year.unwrap_or(current.year()),
                month.unwrap_or(current.month()),
            )?
            .shift(shift)?;
            app::show_calendar(&client, month, day).await?;
        }
        Commands::Widget => {
            app::show_widget(&client).await?;
        }
    }

    Ok(())
}

fn tasas_query(fecha: Option<NaiveDate>, next: bool) -> TasasQuery {
    match (fecha, next) {
        (Some(date), _) => TasasQuery::Fecha(date),
        (None, true) => TasasQuery::Proximo,
        (None, false) => TasasQuery::Latest,
    }
}
