use std::{process::ExitCode, time::Instant};

use amide::{config::SfgConfig, sites::build_sites};
use hhmmss::Hhmmss;
use sfg_exciton::{error::SfgError, rotation::RotationStore, sweep::OrientationSweep};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input/input.json".to_string());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sfg-exciton: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> Result<(), SfgError> {
    let config = SfgConfig::load(config_path)?;
    config.validate()?;

    println!("PDB: {}", config.pdb_file);
    println!("Center frequency: {} cm⁻¹", config.center_freq);
    println!(
        "Tilt range: {}° to {}° ({} points)",
        config.tilt.start, config.tilt.end, config.tilt.points
    );
    println!(
        "Twist range: {}° to {}° ({} points)",
        config.twist.start, config.twist.end, config.twist.points
    );

    let sites = build_sites(
        &config.pdb_file,
        config.center_freq,
        config.site_count,
        config.layers,
    )?;
    println!("Total modes: {}", sites.len());

    let store = RotationStore::open(&config.rotation_database)?;
    let (n_tilt, n_twist) = store.grid_extents();
    println!("Rotation database grid: {n_tilt} × {n_twist}");

    let start = Instant::now();
    OrientationSweep::new(&config, &sites, &store).run()?;

    println!("Sweep finished in {}", start.elapsed().hhmmssxxx());

    Ok(())
}
