use std::{fs::File, io::{BufWriter, Write}, path::Path};

use amide::geometry::Vec3;
use faer::MatRef;

use crate::{error::SfgError, hamiltonian::ExcitonBasis, rotation::TENSOR_DIM};

/// Per-exciton 27-component χ⁽²⁾ vectors in the molecular and lab frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiTensors {
    pub chi_mol: Vec<[f64; 27]>,
    pub chi_lab: Vec<[f64; 27]>,
}

/// Molecular-frame χ⁽²⁾ as the outer product α ⊗ μ.
///
/// Component index = 9·b + a with a running over the column-major Raman
/// components and b over the dipole components; this flattening matches
/// the rotation-operator convention and must not be reordered.
pub fn chi_molecular(raman: &[f64; 9], dipole: Vec3) -> [f64; 27] {
    let mu = [dipole.x, dipole.y, dipole.z];
    let mut chi = [0.; 27];

    for (b, mu_b) in mu.iter().enumerate() {
        for (a, alpha_a) in raman.iter().enumerate() {
            chi[9 * b + a] = alpha_a * mu_b;
        }
    }

    chi
}

/// Dense 27×27 rotation of a molecular-frame χ vector into the lab frame.
pub fn rotate_to_lab(rotation: MatRef<f64>, chi_mol: &[f64; 27]) -> [f64; 27] {
    let mut chi_lab = [0.; 27];

    for (i, out) in chi_lab.iter_mut().enumerate() {
        *out = (0..TENSOR_DIM).map(|j| rotation[(i, j)] * chi_mol[j]).sum();
    }

    chi_lab
}

/// Builds both χ⁽²⁾ variants for every exciton state.
pub fn chi_tensors(excitons: &ExcitonBasis, rotation: MatRef<f64>) -> ChiTensors {
    let chi_mol: Vec<[f64; 27]> = excitons
        .ramans
        .iter()
        .zip(&excitons.dipoles)
        .map(|(raman, &dipole)| chi_molecular(raman, dipole))
        .collect();

    let chi_lab = chi_mol
        .iter()
        .map(|chi| rotate_to_lab(rotation, chi))
        .collect();

    ChiTensors { chi_mol, chi_lab }
}

/// Writes the per-exciton χ components of one orientation into two text
/// files (`chi_mol_tiltT_twistW.txt`, `chi_lab_…`), one `# exciton k`
/// comment line followed by 27 space-separated values each.
pub fn dump_chi_tensors(
    folder: impl AsRef<Path>,
    tilt_deg: f64,
    twist_deg: f64,
    tensors: &ChiTensors,
) -> Result<(), SfgError> {
    let folder = folder.as_ref();
    let tag = format!(
        "tilt{}_twist{}",
        tilt_deg.round() as i64,
        twist_deg.round() as i64
    );

    for (stem, vectors) in [("chi_mol", &tensors.chi_mol), ("chi_lab", &tensors.chi_lab)] {
        let path = folder.join(format!("{stem}_{tag}.txt"));
        let mut file = BufWriter::new(File::create(path)?);

        for (k, chi) in vectors.iter().enumerate() {
            writeln!(file, "# exciton {k}")?;

            let line = chi
                .iter()
                .map(|value| format!("{value:.9e}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(file, "{line}")?;
        }

        file.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{chi_molecular, chi_tensors, rotate_to_lab};
    use crate::{hamiltonian::ExcitonBasis, rotation::TENSOR_DIM};
    use amide::geometry::Vec3;
    use faer::Mat;

    #[test]
    fn test_flattening_order() {
        let raman = [1., 2., 3., 4., 5., 6., 7., 8., 9.];
        let dipole = Vec3::new(10., 100., 1000.);

        let chi = chi_molecular(&raman, dipole);

        // index = 9·b + a
        assert_eq!(chi[0], 10.);
        assert_eq!(chi[8], 90.);
        assert_eq!(chi[9], 100.);
        assert_eq!(chi[22], 5000.);
        assert_eq!(chi[26], 9000.);
    }

    #[test]
    fn test_bilinearity() {
        let raman = [0.3, -1., 2., 0., 1.5, -0.2, 0.7, 0.1, 4.];
        let dipole = Vec3::new(0.2, -0.4, 0.9);

        let base = chi_molecular(&raman, dipole);
        let scaled_dipole = chi_molecular(&raman, dipole * 3.);
        let scaled_raman = chi_molecular(&raman.map(|x| x * -2.), dipole);

        for i in 0..27 {
            assert!((scaled_dipole[i] - 3. * base[i]).abs() < 1e-12);
            assert!((scaled_raman[i] + 2. * base[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_eigenvector_sign_invariance() {
        // flipping an eigenvector flips dipole and Raman together,
        // leaving the bilinear χ unchanged
        let raman = [1., 0.5, 0., 0.5, 2., 0., 0., 0., 3.];
        let dipole = Vec3::new(0., 1., -1.);

        let plus = chi_molecular(&raman, dipole);
        let minus = chi_molecular(&raman.map(|x| -x), -dipole);

        assert_eq!(plus, minus);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation: Mat<f64> = Mat::identity(TENSOR_DIM, TENSOR_DIM);
        let chi = chi_molecular(&[1.; 9], Vec3::new(1., 2., 3.));

        assert_eq!(rotate_to_lab(rotation.as_ref(), &chi), chi);
    }

    #[test]
    fn test_tensors_per_state() {
        let excitons = ExcitonBasis {
            frequencies: vec![1645., 1660.],
            dipoles: vec![Vec3::new(0., 0., 1.), Vec3::new(0., 1., 0.)],
            ramans: vec![[1.; 9], [2.; 9]],
        };
        let rotation: Mat<f64> = Mat::identity(TENSOR_DIM, TENSOR_DIM);

        let tensors = chi_tensors(&excitons, rotation.as_ref());

        assert_eq!(tensors.chi_mol.len(), 2);
        assert_eq!(tensors.chi_lab, tensors.chi_mol);
        // state 0: dipole along z, so only the b = 2 block is populated
        assert_eq!(tensors.chi_mol[0][0], 0.);
        assert_eq!(tensors.chi_mol[0][18], 1.);
    }
}
