use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use amide::{config::SfgConfig, sites::Site, utility::{frequency_grid, linspace}};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::{
    chi::{chi_tensors, dump_chi_tensors, ChiTensors},
    coupling::DipoleCoupling,
    error::SfgError,
    hamiltonian::ExcitonBasis,
    rotation::RotationStore,
    spectrum::{synthesize, Spectrum},
};

/// Data-parallel sweep over the 2-D (tilt, twist) orientation grid.
///
/// Every grid cell is an independent unit of work; the only shared state
/// is the rotation store, which locks its own read path. Output files
/// carry the cell's angles in their name, so concurrent writers never
/// collide.
pub struct OrientationSweep<'a> {
    config: &'a SfgConfig,
    sites: &'a [Site],
    store: &'a RotationStore,
}

impl<'a> OrientationSweep<'a> {
    pub fn new(config: &'a SfgConfig, sites: &'a [Site], store: &'a RotationStore) -> Self {
        Self {
            config,
            sites,
            store,
        }
    }

    /// Runs the full sweep. Failed cells are reported on stderr with
    /// their orientation and skipped; the sweep itself only fails on
    /// setup errors before any cell is scheduled.
    pub fn run(&self) -> Result<(), SfgError> {
        let config = self.config;

        let spectra_folder = PathBuf::from(&config.spectra_folder);
        create_dir_all(&spectra_folder)?;

        let chi_folder = spectra_folder.join("chi_tensors");
        if config.dump_chi_tensors {
            create_dir_all(&chi_folder)?;
        }

        let coupling = DipoleCoupling::amide_one(
            config
                .coupling_cutoff
                .enabled
                .then_some(config.coupling_cutoff.distance),
        );
        let grid = frequency_grid(config.spectrum.start, config.spectrum.end, config.spectrum.step);

        let tilts = linspace(config.tilt.start, config.tilt.end, config.tilt.points);
        let twists = linspace(config.twist.start, config.twist.end, config.twist.points);

        let cells: Vec<(f64, f64)> = twists
            .iter()
            .flat_map(|&twist| tilts.iter().map(move |&tilt| (twist, tilt)))
            .collect();

        cells
            .par_iter()
            .progress()
            .for_each(|&(twist, tilt)| {
                let result = evaluate_cell(self.sites, &coupling, self.store, twist, tilt, config.width, &grid)
                    .and_then(|(spectrum, tensors)| {
                        if config.dump_chi_tensors {
                            dump_chi_tensors(&chi_folder, tilt, twist, &tensors)?;
                        }

                        let path = spectrum_path(&spectra_folder, &config.spectra_prefix, tilt, twist);
                        write_spectrum(&path, &spectrum)
                    });

                if let Err(err) = result {
                    eprintln!("skipping orientation tilt {tilt}°, twist {twist}°: {err}");
                }
            });

        Ok(())
    }
}

/// One orientation cell, from Hamiltonian to spectrum. Pure: identical
/// inputs give bit-identical output regardless of scheduling.
pub fn evaluate_cell(
    sites: &[Site],
    coupling: &DipoleCoupling,
    store: &RotationStore,
    twist_deg: f64,
    tilt_deg: f64,
    width: f64,
    grid: &[f64],
) -> Result<(Spectrum, ChiTensors), SfgError> {
    let excitons = ExcitonBasis::from_sites(sites, coupling)?;
    let rotation = store.lookup(twist_deg, tilt_deg)?;

    let tensors = chi_tensors(&excitons, rotation.as_ref());
    let spectrum = synthesize(&excitons.frequencies, &tensors.chi_lab, width, grid);

    Ok((spectrum, tensors))
}

pub fn spectrum_path(folder: &Path, prefix: &str, tilt_deg: f64, twist_deg: f64) -> PathBuf {
    folder.join(format!(
        "{prefix}_tilt{}_twist{}.txt",
        tilt_deg.round() as i64,
        twist_deg.round() as i64
    ))
}

pub fn write_spectrum(path: &Path, spectrum: &Spectrum) -> Result<(), SfgError> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "# freq   SSP(yyz)   PPP(zzz)")?;
    for ((freq, ssp), ppp) in spectrum
        .frequencies
        .iter()
        .zip(&spectrum.ssp)
        .zip(&spectrum.ppp)
    {
        writeln!(file, "{freq:.9e} {ssp:.9e} {ppp:.9e}")?;
    }

    file.flush()?;

    Ok(())
}
