use amide::{geometry::Vec3, sites::Site};
use faer::{Mat, MatRef, Side};

use crate::{coupling::DipoleCoupling, error::SfgError};

/// Site-basis exciton Hamiltonian: frequencies on the diagonal,
/// pairwise dipole couplings off it.
pub fn build_hamiltonian(sites: &[Site], coupling: &DipoleCoupling) -> Mat<f64> {
    let n = sites.len();
    let mut hamiltonian = Mat::zeros(n, n);

    for (i, site) in sites.iter().enumerate() {
        hamiltonian[(i, i)] = site.frequency;
    }

    for i in 0..n {
        for j in i + 1..n {
            let beta = coupling.between(
                sites[i].dipole,
                sites[j].dipole,
                sites[i].position - sites[j].position,
            );

            hamiltonian[(i, j)] = beta;
            hamiltonian[(j, i)] = beta;
        }
    }

    hamiltonian
}

/// Eigendecomposition with eigenvalues re-sorted ascending and the
/// eigenvector columns permuted to match. The solver does not guarantee
/// any ordering; ties keep the solver order.
pub fn diagonalize(mat: MatRef<f64>) -> Result<(Vec<f64>, Mat<f64>), SfgError> {
    let eigen = mat
        .self_adjoint_eigen(Side::Upper)
        .map_err(|err| SfgError::Eigensolver(format!("{err:?}")))?;

    let values: Vec<f64> = eigen.S().column_vector().iter().copied().collect();
    let vectors = eigen.U();

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let sorted_values = order.iter().map(|&i| values[i]).collect();
    let sorted_vectors = Mat::from_fn(vectors.nrows(), vectors.ncols(), |r, k| {
        vectors[(r, order[k])]
    });

    Ok((sorted_values, sorted_vectors))
}

/// Exciton-basis transition properties, indexed by ascending frequency.
///
/// Eigenvector signs are whatever the solver returns, so individual dipole
/// components are sign-indeterminate; χ⁽²⁾ construction is bilinear and
/// cancels the indeterminacy.
#[derive(Debug, Clone)]
pub struct ExcitonBasis {
    pub frequencies: Vec<f64>,
    pub dipoles: Vec<Vec3>,
    pub ramans: Vec<[f64; 9]>,
}

impl ExcitonBasis {
    /// Builds and diagonalizes the Hamiltonian, then projects the site
    /// dipoles and Raman tensors onto the eigenvector columns.
    pub fn from_sites(sites: &[Site], coupling: &DipoleCoupling) -> Result<Self, SfgError> {
        let hamiltonian = build_hamiltonian(sites, coupling);
        let (frequencies, vectors) = diagonalize(hamiltonian.as_ref())?;

        Ok(Self::project(sites, frequencies, vectors.as_ref()))
    }

    fn project(sites: &[Site], frequencies: Vec<f64>, vectors: MatRef<f64>) -> Self {
        let n = sites.len();
        let site_ramans: Vec<[f64; 9]> = sites.iter().map(|site| site.raman.flatten()).collect();

        let mut dipoles = Vec::with_capacity(n);
        let mut ramans = Vec::with_capacity(n);

        for k in 0..n {
            let mut dipole = Vec3::ZERO;
            let mut raman = [0.; 9];

            for (i, site) in sites.iter().enumerate() {
                let weight = vectors[(i, k)];

                dipole = dipole + site.dipole * weight;
                for (component, value) in raman.iter_mut().zip(site_ramans[i]) {
                    *component += weight * value;
                }
            }

            dipoles.push(dipole);
            ramans.push(raman);
        }

        Self {
            frequencies,
            dipoles,
            ramans,
        }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::{build_hamiltonian, diagonalize, ExcitonBasis};
    use crate::coupling::DipoleCoupling;
    use amide::{
        geometry::{Mat3, Vec3},
        sites::Site,
    };
    use faer::Mat;
    use rand::{distr::Uniform, rng, Rng};

    fn site(position: Vec3, frequency: f64, dipole: Vec3) -> Site {
        Site {
            position,
            frequency,
            dipole,
            raman: Mat3::diagonal(1., 1., 1.),
        }
    }

    #[test]
    fn test_sorted_and_orthonormal() {
        let mut rng = rng();
        let size = 12;

        let mut mat =
            Mat::from_fn(size, size, |_, _| rng.sample(Uniform::new(-10., 10.).unwrap()));
        for j in 0..size {
            for i in 0..j {
                mat[(i, j)] = mat[(j, i)];
            }
        }

        let (values, vectors) = diagonalize(mat.as_ref()).unwrap();

        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1]);
        }

        for a in 0..size {
            for b in 0..size {
                let dot: f64 = (0..size).map(|r| vectors[(r, a)] * vectors[(r, b)]).sum();
                let expected = if a == b { 1. } else { 0. };

                assert!((dot - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_two_site_splitting() {
        // identical frequencies with collinear dipoles give ω₀ ± |J|
        let frequency = 1650.;
        let dipole = Vec3::new(0., 0., 1.);
        let sites = [
            site(Vec3::ZERO, frequency, dipole),
            site(Vec3::new(4., 0., 0.), frequency, dipole),
        ];
        let coupling = DipoleCoupling::amide_one(None);

        let j = coupling.between(dipole, dipole, Vec3::new(-4., 0., 0.));
        assert!(j != 0.);

        let hamiltonian = build_hamiltonian(&sites, &coupling);
        let (values, _) = diagonalize(hamiltonian.as_ref()).unwrap();

        assert!((values[0] - (frequency - j.abs())).abs() < 1e-8);
        assert!((values[1] - (frequency + j.abs())).abs() < 1e-8);
    }

    #[test]
    fn test_single_site_passthrough() {
        let sites = [site(Vec3::ZERO, 1655., Vec3::new(0., 1., 0.))];
        let excitons = ExcitonBasis::from_sites(&sites, &DipoleCoupling::amide_one(None)).unwrap();

        assert_eq!(excitons.len(), 1);
        assert!((excitons.frequencies[0] - 1655.).abs() < 1e-10);
        // single eigenvector is ±1; dipole magnitude is sign-invariant
        assert!((excitons.dipoles[0].norm() - 1.).abs() < 1e-10);
    }

    #[test]
    fn test_projection_is_linear() {
        let sites = [
            site(Vec3::ZERO, 1650., Vec3::new(0., 0., 1.)),
            site(Vec3::new(5., 0., 0.), 1660., Vec3::new(0., 1., 0.)),
        ];
        let coupling = DipoleCoupling::amide_one(None);
        let excitons = ExcitonBasis::from_sites(&sites, &coupling).unwrap();

        let scaled: Vec<_> = sites
            .iter()
            .map(|s| Site {
                dipole: s.dipole * 2.,
                ..*s
            })
            .collect();
        let hamiltonian = build_hamiltonian(&sites, &coupling);
        let (_, vectors) = diagonalize(hamiltonian.as_ref()).unwrap();
        let scaled_excitons = ExcitonBasis::project(
            &scaled,
            excitons.frequencies.clone(),
            vectors.as_ref(),
        );

        for k in 0..2 {
            let diff = scaled_excitons.dipoles[k] - excitons.dipoles[k] * 2.;
            assert!(diff.norm() < 1e-12);
        }
    }
}
