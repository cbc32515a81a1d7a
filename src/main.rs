use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod logging;

use sale_tunnel::breadcrumb::{self, render_line, Breadcrumb, BreadcrumbStyle};
use sale_tunnel::checkout::{CheckoutError, OrderCache, Product, SaleTunnel, Session, User};
use sale_tunnel::config::Config;
use sale_tunnel::manifest::load_manifest;
use sale_tunnel::steps::{Stepper, TracingListener};

#[derive(Parser)]
#[command(name = "sale-tunnel")]
#[command(about = "Manifest-driven step engine and breadcrumb projection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Write logs to a file under the state directory
    #[arg(long, global = true)]
    log_file: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest and print its step order
    Validate {
        /// Manifest file (JSON, YAML or TOML)
        manifest: PathBuf,
    },

    /// Project a manifest into breadcrumb entries
    Breadcrumb {
        /// Manifest file (JSON, YAML or TOML)
        manifest: PathBuf,

        /// Current step (defaults to the manifest start)
        #[arg(short, long, conflicts_with = "done")]
        step: Option<String>,

        /// Project the completed process
        #[arg(long)]
        done: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk a manifest, printing the breadcrumb after each move
    Walk {
        /// Manifest file (JSON, YAML or TOML)
        manifest: PathBuf,

        /// Number of times to advance
        #[arg(short, long, default_value_t = 1)]
        advance: usize,

        /// Reset to the start step after advancing
        #[arg(short, long)]
        reset: bool,
    },

    /// Run the checkout tunnel with console collaborators
    Checkout {
        /// Number of times to press "next"
        #[arg(short, long, default_value_t = 3)]
        advance: usize,

        /// Run without a logged-in user
        #[arg(long)]
        anonymous: bool,

        /// Product title shown in messages
        #[arg(long, default_value = "Introduction to Rust")]
        product: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    let logging_handle = logging::init_logging(&config, cli.log_file, cli.debug)?;

    let result = match cli.command {
        Commands::Validate { manifest } => cmd_validate(&manifest),
        Commands::Breadcrumb {
            manifest,
            step,
            done,
            json,
        } => cmd_breadcrumb(&config, &manifest, step, done, json),
        Commands::Walk {
            manifest,
            advance,
            reset,
        } => cmd_walk(&config, &manifest, advance, reset),
        Commands::Checkout {
            advance,
            anonymous,
            product,
        } => cmd_checkout(&config, advance, anonymous, product),
    };

    if let Some(log_path) = logging_handle.log_file_path.as_deref() {
        logging::report_log_file(log_path);
    }

    result
}

fn print_breadcrumb(config: &Config, crumb: &Breadcrumb) {
    let style = BreadcrumbStyle::from(&config.breadcrumb);
    println!("{}", render_line(crumb, &style));
}

fn cmd_validate(path: &Path) -> Result<()> {
    let manifest = load_manifest(path)?;
    let order = manifest.step_order()?;

    println!("Manifest is valid ({} steps)", manifest.len());
    println!("  root:  {}", manifest.root()?);
    println!("  start: {}", manifest.start);
    println!("  order: {}", order.join(" > "));
    Ok(())
}

fn cmd_breadcrumb(
    config: &Config,
    path: &Path,
    step: Option<String>,
    done: bool,
    json: bool,
) -> Result<()> {
    let manifest = load_manifest(path)?;
    let current = if done {
        None
    } else {
        Some(step.unwrap_or_else(|| manifest.start.clone()))
    };

    let crumb = breadcrumb::project(&manifest, current.as_deref())?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&crumb).context("Failed to serialize breadcrumb")?
        );
    } else {
        print_breadcrumb(config, &crumb);
    }
    Ok(())
}

fn cmd_walk(config: &Config, path: &Path, advance: usize, reset: bool) -> Result<()> {
    let manifest = load_manifest(path)?;
    let process = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut stepper = Stepper::builder(manifest)
        .listener(TracingListener::new(process))
        .build()?;
    print_breadcrumb(config, &stepper.breadcrumb()?);

    for _ in 0..advance {
        if stepper.is_complete() {
            info!("Process already complete, further advances are ignored");
            break;
        }
        stepper.advance();
        print_breadcrumb(config, &stepper.breadcrumb()?);
    }

    if reset {
        stepper.reset();
        print_breadcrumb(config, &stepper.breadcrumb()?);
    }

    match stepper.current_step() {
        Some(step) => println!("Current step: {step}"),
        None => println!("Process complete"),
    }
    Ok(())
}

/// Session backed by the command line flags
struct ConsoleSession {
    user: Option<User>,
}

impl Session for ConsoleSession {
    fn user(&self) -> Option<User> {
        self.user.clone()
    }

    fn login(&self) {
        println!("Redirecting to login...");
    }
}

/// Order cache that only reports invalidations
struct ConsoleOrders;

impl OrderCache for ConsoleOrders {
    fn invalidate(&self) {
        info!("Order cache invalidated, orders will be refetched");
        println!("Orders refreshed");
    }
}

fn cmd_checkout(config: &Config, advance: usize, anonymous: bool, title: String) -> Result<()> {
    let user = (!anonymous).then(|| User::new(whoami()));
    let product = Product {
        id: "demo".to_string(),
        call_to_action: format!("Buy {title}"),
        title,
    };

    let mut tunnel = SaleTunnel::new(
        product,
        Arc::new(ConsoleSession { user }),
        Arc::new(ConsoleOrders),
        &config.checkout,
    )?;
    tunnel.subscribe(TracingListener::new("checkout"));

    println!("[{}]", tunnel.product().call_to_action);
    match tunnel.open() {
        Ok(()) => {}
        Err(CheckoutError::LoginRequired(title)) => {
            println!("Login to purchase {title}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    print_breadcrumb(config, &tunnel.breadcrumb()?);
    for _ in 0..advance {
        if !tunnel.is_open() {
            break;
        }
        tunnel.next()?;
        print_breadcrumb(config, &tunnel.breadcrumb()?);
    }

    if tunnel.is_open() {
        println!("Dialog open at step: {}", tunnel.step().unwrap_or("-"));
    } else {
        println!("Dialog closed");
    }
    Ok(())
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "learner".to_string())
}
