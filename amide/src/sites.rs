use std::path::Path;

use crate::{
    amide_unit::{amide_geometry, extract_amide_units, local_frame, LocalFrame},
    error::AmideError,
    geometry::{Mat3, Vec3},
    pdb::read_pdb_atoms,
};

/// One localized amide-I oscillator.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    /// Vibrational-center coordinate in the simulation frame.
    pub position: Vec3,
    /// Fundamental frequency in cm⁻¹.
    pub frequency: f64,
    /// Transition dipole in the simulation frame.
    pub dipole: Vec3,
    /// Raman tensor in the simulation frame.
    pub raman: Mat3,
}

/// Angle of the amide-I transition dipole in the molecular yz plane.
const DIPOLE_ANGLE_DEG: f64 = 25.0;
/// Rotation of the Raman tensor principal axes around molecular x.
const RAMAN_ANGLE_DEG: f64 = 34.0;

/// Amide-I transition dipole in the molecular frame.
pub fn intrinsic_dipole() -> Vec3 {
    let angle = DIPOLE_ANGLE_DEG.to_radians();

    Vec3::new(0., angle.sin(), -angle.cos())
}

/// Amide-I Raman tensor in the molecular frame.
pub fn intrinsic_raman() -> Mat3 {
    let principal = Mat3::diagonal(0.05 * 5., 0.20 * 5., 1.0 * 5.);

    principal.rotated_by(&Mat3::rotation_x(RAMAN_ANGLE_DEG.to_radians()))
}

/// Rotates the intrinsic molecular properties into the simulation frame
/// of one residue, with the local frame axes as rotation columns.
pub fn site_properties(frame: &LocalFrame) -> (Vec3, Mat3) {
    let rotation = Mat3::from_columns(frame.x_axis, frame.y_axis, frame.z_axis);

    let dipole = rotation.mul_vec(intrinsic_dipole());
    let raman = intrinsic_raman().rotated_by(&rotation);

    (dipole, raman)
}

/// Builds the site model for one run: parse the structure, take the first
/// `site_count` amide units, derive per-residue properties and replicate
/// the set `layers` times at the uniform `center_freq`.
pub fn build_sites(
    pdb_path: impl AsRef<Path>,
    center_freq: f64,
    site_count: usize,
    layers: usize,
) -> Result<Vec<Site>, AmideError> {
    let atoms = read_pdb_atoms(pdb_path)?;
    let units = extract_amide_units(&atoms);

    if units.len() < site_count {
        return Err(AmideError::NotEnoughSites {
            available: units.len(),
            requested: site_count,
        });
    }

    let layer_sites: Vec<Site> = units[..site_count]
        .iter()
        .map(|unit| {
            let geometry = amide_geometry(unit);
            let frame = local_frame(&geometry);
            let (dipole, raman) = site_properties(&frame);

            Site {
                position: geometry.center,
                frequency: center_freq,
                dipole,
                raman,
            }
        })
        .collect();

    let mut sites = Vec::with_capacity(layer_sites.len() * layers);
    for _ in 0..layers {
        sites.extend_from_slice(&layer_sites);
    }

    Ok(sites)
}
