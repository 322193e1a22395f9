//! Delivery analytics CLI

use clap::{Args, Parser, Subcommand};
use delivery_analytics::cli::{OutputFormat, OutputFormatter};
use delivery_analytics::execution::ReportContext;
use delivery_analytics::reports::{Report, ReportConfig};
use delivery_analytics::sample::{SampleGenerator, SampleSize};
use delivery_analytics::Result;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "delivery_analytics")]
#[command(about = "Analytical reports over a food-delivery dataset")]
struct Cli {
    /// JSON file with report parameters
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sample dataset and write it to Parquet files
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "20")]
        restaurants: usize,

        #[arg(long, default_value = "200")]
        customers: usize,

        #[arg(long, default_value = "30")]
        riders: usize,

        #[arg(long, default_value = "10000")]
        orders: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Run a single report
    Report {
        /// Report number (1-17) or name
        #[arg(short, long)]
        num: Report,

        /// Directory of Parquet tables (sample data is generated if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Maximum rows to display
        #[arg(short, long)]
        max_rows: Option<usize>,

        /// Print the reference SQL before the result
        #[arg(long)]
        sql: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Run every report
    All {
        /// Directory of Parquet tables (sample data is generated if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// List available reports
    List,
}

/// Flags that override single fields of the loaded config
#[derive(Args)]
struct ConfigOverrides {
    /// Customer for report 1
    #[arg(long)]
    customer: Option<String>,

    /// Dishes kept per year in report 1
    #[arg(long)]
    top_n: Option<i64>,

    /// Order-count threshold of report 3
    #[arg(long)]
    min_orders: Option<i64>,

    /// Spend threshold of report 4
    #[arg(long)]
    min_spent: Option<f64>,

    /// Commission rate of report 13
    #[arg(long)]
    commission: Option<f64>,

    /// Year ranked by report 17
    #[arg(long)]
    revenue_year: Option<i32>,
}

impl ConfigOverrides {
    fn apply(self, mut config: ReportConfig) -> ReportConfig {
        if let Some(name) = self.customer {
            config.customer_name = name;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(n) = self.min_orders {
            config.min_order_count = n;
        }
        if let Some(v) = self.min_spent {
            config.min_total_spent = v;
        }
        if let Some(rate) = self.commission {
            config.rider_commission_rate = rate;
        }
        if let Some(year) = self.revenue_year {
            config.city_revenue_year = year;
        }
        config
    }
}

fn main() -> ExitCode {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            restaurants,
            customers,
            riders,
            orders,
            seed,
        } => {
            let size = SampleSize {
                restaurants,
                customers,
                riders,
                orders,
            };
            let start = Instant::now();
            let store = SampleGenerator::with_seed(size, seed).generate_to_parquet(&output)?;

            println!("Generated data in {:?}", start.elapsed());
            println!(
                "Wrote {} orders and {} deliveries to {}",
                store.orders().len(),
                store.deliveries().len(),
                output.display()
            );
        }

        Commands::Report {
            num,
            data,
            format,
            max_rows,
            sql,
            overrides,
        } => {
            let config = overrides.apply(load_config(cli.config.as_deref())?);
            let ctx = open_context(data.as_deref())?.with_config(config)?;

            if sql {
                println!("{}", num.reference_sql(ctx.config()));
                println!();
            }

            let result = ctx.run(num)?;
            let mut formatter = OutputFormatter::new(format);
            if let Some(max) = max_rows {
                formatter = formatter.with_max_rows(max);
            }
            formatter.print(&result.batches)?;

            if format == OutputFormat::Table {
                println!(
                    "{} rows in {:.3}ms",
                    result.row_count,
                    result.metrics.execute_time.as_secs_f64() * 1000.0
                );
            }
        }

        Commands::All {
            data,
            format,
            overrides,
        } => {
            let config = overrides.apply(load_config(cli.config.as_deref())?);
            let ctx = open_context(data.as_deref())?.with_config(config)?;
            let formatter = OutputFormatter::new(format);

            let start = Instant::now();
            let results = ctx.run_all();
            let elapsed = start.elapsed();

            let mut failed = 0;
            for (report, result) in Report::ALL.iter().zip(results) {
                println!("=== {}: {} ===", report, report.title());
                match result {
                    Ok(result) => {
                        formatter.print(&result.batches)?;
                        println!(
                            "{} rows in {:.3}ms\n",
                            result.row_count,
                            result.metrics.execute_time.as_secs_f64() * 1000.0
                        );
                    }
                    Err(e) => {
                        failed += 1;
                        println!("ERROR - {}\n", e);
                    }
                }
            }

            println!("=== Summary ===");
            println!("Total time: {:?}", elapsed);
            println!(
                "Successful reports: {}/{}",
                Report::ALL.len() - failed,
                Report::ALL.len()
            );
        }

        Commands::List => {
            for report in Report::ALL {
                println!("{:>2}  {:<30} {}", report.number(), report.name(), report.title());
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::from_json_file(path),
        None => Ok(ReportConfig::default()),
    }
}

fn open_context(data: Option<&Path>) -> Result<ReportContext> {
    let start = Instant::now();
    let ctx = match data {
        Some(dir) => ReportContext::from_parquet(dir)?,
        None => {
            let store = SampleGenerator::new(SampleSize::default()).generate()?;
            ReportContext::from_store(&store)?
        }
    };
    info!(elapsed = ?start.elapsed(), "dataset ready");
    Ok(ctx)
}
