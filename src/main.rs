use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use smart_city::city::{CityController, Role};

#[derive(Parser)]
#[command(name = "smart_city")]
#[command(about = "Smart city subsystem controller")]
struct Cli {
    /// Role of the operator driving the security subsystem
    #[arg(long, value_enum, default_value_t = Role::Viewer)]
    role: Role,

    /// Seed for reproducible energy readings
    #[arg(long)]
    seed: Option<u64>,

    /// Number of energy readings to take while the city is running
    #[arg(long, default_value = "3")]
    readings: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Start the city, exercise the security proxy as the configured role,
/// then shut everything down
fn run_headless(cli: &Cli) -> Result<()> {
    let mut city = CityController::new(cli.role, cli.seed)?;

    let started = city.start_city();
    for (name, error) in &started.failed {
        warn!("{} did not start: {}", name, error);
    }

    println!("=== City Status ===");
    println!("{}", city.status_report());
    println!();

    let security = city.security();
    let cameras = security.activate_cameras()?;
    let armed = security.arm()?;
    info!("Activate cameras as {}: {:?}", cli.role, cameras);
    info!("Arm security as {}: {:?}", cli.role, armed);
    println!("Security: {}", security.status()?);

    for sample in 1..=cli.readings {
        let reading = city.energy_reading()?;
        println!(
            "Energy reading {}: {:.1} kW consumed, {:.1} kW produced ({:.1}% efficient)",
            sample,
            reading.consumption,
            reading.production,
            reading.efficiency()
        );
    }
    println!();

    let log = city.security().access_log();
    if log.is_empty() {
        println!("Access log is only available to admins");
    } else {
        println!("=== Access Log ===");
        for entry in &log {
            println!("{}", entry);
        }
    }
    println!();

    let stopped = city.shutdown();
    let stats = city.registry().stats();

    info!("=== CITY RUN COMPLETE ===");
    info!("Subsystems registered: {}", stats.total);
    info!("Subsystems started: {}", started.succeeded.len());
    info!("Subsystems stopped: {}", stopped.succeeded.len());
    info!("Subsystems still active: {}", stats.active);
    info!("Security armed: {}", city.security().is_armed()?);
    Ok(())
}
