use num::complex::Complex64;

/// χ_yyz component in the 9·b + a flattening (b = z, α = yy).
pub const SSP_COMPONENT: usize = 22;
/// χ_zzz component (b = z, α = zz).
pub const PPP_COMPONENT: usize = 26;

/// Intensity curves of one orientation over the caller's frequency grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub ssp: Vec<f64>,
    pub ppp: Vec<f64>,
}

/// Lorentzian-broadened coherent sum over all exciton states,
/// I(ω) = |Σₖ χₖ / (ω − ωₖ + iΓ)|², for the SSP and PPP components.
pub fn synthesize(
    exciton_freqs: &[f64],
    chi_lab: &[[f64; 27]],
    width: f64,
    grid: &[f64],
) -> Spectrum {
    let mut ssp = Vec::with_capacity(grid.len());
    let mut ppp = Vec::with_capacity(grid.len());

    for &omega in grid {
        let mut sum_ssp = Complex64::ZERO;
        let mut sum_ppp = Complex64::ZERO;

        for (&omega_k, chi) in exciton_freqs.iter().zip(chi_lab) {
            let lorentzian = Complex64::new(omega - omega_k, width).inv();

            sum_ssp += chi[SSP_COMPONENT] * lorentzian;
            sum_ppp += chi[PPP_COMPONENT] * lorentzian;
        }

        ssp.push(sum_ssp.norm_sqr());
        ppp.push(sum_ppp.norm_sqr());
    }

    Spectrum {
        frequencies: grid.to_vec(),
        ssp,
        ppp,
    }
}
