//! # isp-router CLI
//!
//! Loads an ISP backbone from CSV and answers route queries, either
//! through the interactive menu or one command at a time. Also renders
//! the network and serves the renders through the gallery.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use isp_router::{
    compare_criteria,
    config::Config,
    gallery,
    load_network,
    menu::Menu,
    route, routes_from,
    utils::render::{render, ImageFormat, RenderOptions},
    Criterion, HeaderPolicy, Network, RouteOutcome, RouterError,
};
use log::error;

/// Command-line interface for isp-router
#[derive(Parser)]
#[command(name = "isp-router")]
#[command(about = "Least-cost routing over an ISP backbone")]
#[command(long_about = "Finds least-cost routes between cities of an ISP backbone:
  isp-router                                # Interactive menu
  isp-router route Lima Cusco -c cost       # Cheapest route
  isp-router compare Lima Cusco             # Best route under every criterion
  isp-router render --from Lima --to Cusco  # Draw the network with a route
  isp-router gallery                        # Browse rendered images

Input rows: origin,destination,latency_ms,cost_per_mb,bandwidth_mbps")]
#[command(version)]
struct Cli {
    /// JSON settings file; command-line values take precedence
    #[arg(long, env = "ISP_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Network CSV file
    #[arg(short, long, env = "ISP_ROUTER_INPUT")]
    input: Option<PathBuf>,

    /// Header handling: auto, present or absent
    #[arg(long, env = "ISP_ROUTER_HEADER")]
    header: Option<HeaderPolicy>,

    /// Directory for rendered images
    #[arg(short, long, env = "ISP_ROUTER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Best route between two cities
    Route {
        from: String,
        to: String,
        /// latency, cost, bandwidth or composite
        #[arg(short, long, default_value = "latency")]
        criterion: Criterion,
        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },
    /// Best route between two cities under every criterion
    Compare { from: String, to: String },
    /// Routes from one city to all others
    From {
        origin: String,
        #[arg(short, long, default_value = "latency")]
        criterion: Criterion,
    },
    /// Network statistics
    Stats,
    /// Draw the network, optionally highlighting a route
    Render {
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Criterion of the highlighted route
        #[arg(short, long, default_value = "latency")]
        criterion: Criterion,
        /// Metric that colors the links
        #[arg(long, default_value = "latency")]
        visual: Criterion,
        /// Print link values
        #[arg(long)]
        labels: bool,
        /// File name without extension
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value = "png")]
        format: Format,
    },
    /// Serve rendered images over HTTP
    Gallery {
        /// Listen address
        #[arg(long, env = "ISP_ROUTER_GALLERY_BIND")]
        bind: Option<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Format {
    Png,
    Svg,
    Dot,
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ImageFormat::Png,
            Format::Svg => ImageFormat::Svg,
            Format::Dot => ImageFormat::Dot,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if let Some(header) = cli.header {
        config.header = header;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    Ok(config)
}

fn load(config: &Config) -> anyhow::Result<Network> {
    load_network(&config.input, config.header).context(
        "could not load the network (expected rows: origin,destination,latency_ms,cost_per_mb,bandwidth_mbps)",
    )
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = resolve_config(&cli)?;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Gallery { bind } => {
            if let Some(bind) = bind {
                config.gallery_bind = bind;
            }
            let addr = config.gallery_addr()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(gallery::serve(config.output_dir.clone(), addr))?;
        }
        Command::Menu => {
            let network = load(&config)?;
            let stdin = io::stdin();
            Menu::new(&network, &config, stdin.lock(), io::stdout()).run()?;
        }
        Command::Route {
            from,
            to,
            criterion,
            json,
        } => {
            let network = load(&config)?;
            match route(&network, &from, &to, criterion) {
                Ok(found) if json => println!("{}", serde_json::to_string_pretty(&found)?),
                Ok(found) => {
                    println!("{} ({criterion}, weight {:.3})", found, found.weight);
                    if let Some(metrics) = found.metrics {
                        println!(
                            "latency {:.1} ms | cost {:.4}/MB | bottleneck {:.0} Mbps | {} hops",
                            metrics.latency_total,
                            metrics.cost_total,
                            metrics.bottleneck_bandwidth,
                            metrics.hops
                        );
                    }
                }
                Err(err @ RouterError::Unreachable { .. }) => println!("{err}"),
                Err(err) => return Err(err.into()),
            }
        }
        Command::Compare { from, to } => {
            let network = load(&config)?;
            for outcome in compare_criteria(&network, &from, &to)? {
                print_outcome(&outcome);
            }
        }
        Command::From { origin, criterion } => {
            let network = load(&config)?;
            for outcome in routes_from(&network, &origin, criterion)? {
                print_outcome(&outcome);
            }
        }
        Command::Stats => {
            let stats = load(&config)?.stats();
            println!("cities: {}", stats.city_count);
            println!("connections: {}", stats.connection_count);
            if let Some((city, degree)) = &stats.most_connected {
                println!("most connected: {city} ({degree})");
            }
            for (city, degree) in &stats.degrees {
                println!("  {city}: {degree}");
            }
        }
        Command::Render {
            from,
            to,
            criterion,
            visual,
            labels,
            name,
            format,
        } => {
            let network = load(&config)?;
            let highlighted = match (&from, &to) {
                (Some(from), Some(to)) => Some(route(&network, from, to, criterion)?),
                _ => None,
            };
            let file_stem = name.unwrap_or_else(|| match (&from, &to) {
                (Some(from), Some(to)) => RenderOptions::route_file_stem(from, to, criterion, visual),
                _ => RenderOptions::network_file_stem(visual),
            });
            let options = RenderOptions {
                visual,
                show_labels: labels,
                format: format.into(),
                output_dir: config.output_dir.clone(),
                file_stem,
            };
            let path = render(
                &network,
                highlighted.as_ref().map(|found| found.path.as_slice()),
                &options,
            )?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_outcome(outcome: &RouteOutcome) {
    match outcome {
        RouteOutcome::Found(found) => {
            let summary = found.metrics.map_or_else(String::new, |metrics| {
                format!(
                    " | {:.1} ms, {:.4}/MB, {:.0} Mbps",
                    metrics.latency_total, metrics.cost_total, metrics.bottleneck_bandwidth
                )
            });
            println!("[{}] {}{}", found.criterion, found, summary);
        }
        RouteOutcome::Unreachable {
            criterion,
            destination,
        } => println!("[{criterion}] {destination}: no connection"),
    }
}
