//! Interferometric local-field amplitudes for the prism/film/water
//! geometry. Independent of the spectral pipeline: the sweep never
//! multiplies these into the raw intensities.

use std::{
    f64::consts::{FRAC_PI_2, FRAC_PI_4, PI},
    fs::File,
    io::BufReader,
    path::Path,
};

use amide::error::AmideError;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::SfgError;

/// Optical constants of one three-interface stack, per beam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FresnelParams {
    /// Visible beam incidence angle from the prism face, degrees.
    pub a_vis_deg: f64,
    /// IR beam incidence angle from the prism face, degrees.
    pub a_ir_deg: f64,

    /// Refractive indices air/prism/film/water at the visible wavelength.
    pub n_vis: [f64; 4],
    /// Refractive indices at the IR wavelength.
    pub n_ir: [f64; 4],
    /// Refractive indices at the sum-frequency wavelength.
    pub n_sfg: [f64; 4],

    pub lambda_vis_nm: f64,
    pub lambda_ir_nm: f64,
    pub lambda_sfg_nm: f64,

    pub film_thickness_nm: f64,
}

impl FresnelParams {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SfgError> {
        let file = File::open(path)?;
        let params = serde_json::from_reader(BufReader::new(file)).map_err(AmideError::from)?;

        Ok(params)
    }
}

/// Magnitudes of the five polarization prefactors at the film/water
/// interface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FresnelFactors {
    pub f_ssp_yyz: f64,
    pub f_ppp_xxz: f64,
    pub f_ppp_xzx: f64,
    pub f_ppp_zxx: f64,
    pub f_ppp_zzz: f64,
}

/// In-film propagation and local fields of one beam.
struct BeamFields {
    sin_phi1: f64,
    cos_phi1: f64,
    lxx: Complex64,
    lyy: Complex64,
    lzz: Complex64,
}

fn clamp_sin(x: f64) -> f64 {
    x.clamp(-1., 1.)
}

/// Multiple-beam film interference for one beam entering the film at
/// `sin_phi1` from the prism side. `n = [air, prism, film, water]`.
fn beam_fields(n: [f64; 4], lambda_nm: f64, sin_phi1: f64, thickness_nm: f64) -> BeamFields {
    let [_, n1, n2, n3] = n;

    let phi1 = clamp_sin(sin_phi1).asin();
    let cos_phi1 = phi1.cos();

    let phi2 = clamp_sin(n1 * sin_phi1 / n2).asin();
    let cos_phi2 = phi2.cos();

    let phi3 = clamp_sin(n1 * sin_phi1 / n3).asin();
    let cos_phi3 = phi3.cos();

    let rp12 = (n2 * cos_phi1 - n1 * cos_phi2) / (n2 * cos_phi1 + n1 * cos_phi2);
    let tp12 = 2.0 * n1 * cos_phi1 / (n2 * cos_phi1 + n1 * cos_phi2);
    let rs12 = (n1 * cos_phi1 - n2 * cos_phi2) / (n1 * cos_phi1 + n2 * cos_phi2);
    let ts12 = 2.0 * n1 * cos_phi1 / (n1 * cos_phi1 + n2 * cos_phi2);

    let rp23 = (n2 * cos_phi2 - n3 * cos_phi3) / (n3 * cos_phi2 + n2 * cos_phi3);
    let rs23 = (n2 * cos_phi2 - n3 * cos_phi3) / (n2 * cos_phi2 + n3 * cos_phi3);

    let theta = 2.0 * PI / lambda_nm * n2 * thickness_nm * cos_phi2;
    let round_trip = Complex64::from_polar(1., 2.0 * theta);
    let phase = Complex64::from_polar(1., theta);

    let t_p = tp12 / (1.0 + rp12 * rp23 * round_trip);
    let t_s = ts12 / (1.0 + rs12 * rs23 * round_trip);

    // local fields at the film/water interface, with the mean index
    // of the two media on the z component
    let n_mean = (n2 + n3) / 2.0;

    BeamFields {
        sin_phi1,
        cos_phi1,
        lxx: t_p * phase * (1.0 - rp23) * (cos_phi2 / cos_phi1),
        lyy: t_s * phase * (1.0 + rs23),
        lzz: t_p * phase * (1.0 + rp23) * (n1 * n2) / (n_mean * n_mean),
    }
}

/// Entrance refraction at the prism face: incidence angle measured from
/// the face, returning (sin, cos) of the internal propagation angle from
/// the film normal and (sin, cos) at the face for the 0–1 transmissions.
fn prism_entry(n0: f64, n1: f64, a_deg: f64) -> (f64, f64, f64) {
    let sigma0 = FRAC_PI_2 - a_deg.to_radians();
    let sigma1 = clamp_sin(n0 * sigma0.sin() / n1).asin();

    // propagation angle inside the prism, measured from the normal
    let phi1 = FRAC_PI_2 - sigma1;

    (phi1.sin(), sigma0.cos(), sigma1.cos())
}

/// Fresnel prefactors of the air/prism/film/water stack, as magnitudes
/// of the five second-order polarization combinations.
pub fn fresnel_factors(params: &FresnelParams) -> FresnelFactors {
    let d = params.film_thickness_nm;

    let [n0_vis, n1_vis, ..] = params.n_vis;
    let [n0_ir, n1_ir, ..] = params.n_ir;
    let [n0_su, n1_su, ..] = params.n_sfg;

    let (sin_phi1_vis, cos_sigma0_vis, cos_sigma1_vis) =
        prism_entry(n0_vis, n1_vis, params.a_vis_deg);
    let (sin_phi1_ir, cos_sigma0_ir, cos_sigma1_ir) = prism_entry(n0_ir, n1_ir, params.a_ir_deg);

    // sum-frequency propagation direction from in-plane phase matching
    let sin_phi1_su = clamp_sin(
        params.lambda_sfg_nm / n1_su
            * (n1_vis * sin_phi1_vis / params.lambda_vis_nm
                + n1_ir * sin_phi1_ir / params.lambda_ir_nm),
    );

    let vis = beam_fields(params.n_vis, params.lambda_vis_nm, sin_phi1_vis, d);
    let ir = beam_fields(params.n_ir, params.lambda_ir_nm, sin_phi1_ir, d);
    let su = beam_fields(params.n_sfg, params.lambda_sfg_nm, sin_phi1_su, d);

    // exit geometry of the SFG beam through the prism face
    let sigma1_su = sin_phi1_su.asin() - FRAC_PI_4;
    let cos_sigma1_su = sigma1_su.cos();
    let cos_sigma0_su = clamp_sin(n1_su * sigma1_su.sin() / n0_su).asin().cos();

    // air-prism transmissions on entry (vis, ir) and exit (sfg)
    let tp01_ir = 2.0 * n0_ir * cos_sigma0_ir / (n1_ir * cos_sigma0_ir + n0_ir * cos_sigma1_ir);
    let tp01_vis = 2.0 * n0_vis * cos_sigma0_vis / (n1_vis * cos_sigma0_vis + n0_vis * cos_sigma1_vis);
    let ts01_ir = 2.0 * n0_ir * cos_sigma0_ir / (n0_ir * cos_sigma0_ir + n1_ir * cos_sigma1_ir);
    let ts01_vis = 2.0 * n0_vis * cos_sigma0_vis / (n0_vis * cos_sigma0_vis + n1_vis * cos_sigma1_vis);

    let tp10_su = 2.0 * n1_su * cos_sigma1_su / (n0_su * cos_sigma1_su + n1_su * cos_sigma0_su);
    let ts10_su = 2.0 * n1_su * cos_sigma1_su / (n1_su * cos_sigma1_su + n0_su * cos_sigma0_su);

    let cos_phi1_su = (1.0 - sin_phi1_su * sin_phi1_su).sqrt();

    let f_ssp_yyz = ts10_su * su.lyy * ts01_vis * vis.lyy * tp01_ir * ir.lzz * ir.sin_phi1;

    let f_ppp_xxz = -tp10_su * su.lxx * cos_phi1_su
        * tp01_vis * vis.lxx * vis.cos_phi1
        * tp01_ir * ir.lzz * ir.sin_phi1;

    let f_ppp_xzx = -tp10_su * su.lxx * cos_phi1_su
        * tp01_vis * vis.lzz * vis.sin_phi1
        * tp01_ir * ir.lxx * ir.cos_phi1;

    let f_ppp_zxx = tp10_su * su.lzz * sin_phi1_su
        * tp01_vis * vis.lxx * vis.cos_phi1
        * tp01_ir * ir.lxx * ir.cos_phi1;

    let f_ppp_zzz = tp10_su * su.lzz * sin_phi1_su
        * tp01_vis * vis.lzz * vis.sin_phi1
        * tp01_ir * ir.lzz * ir.sin_phi1;

    FresnelFactors {
        f_ssp_yyz: f_ssp_yyz.norm(),
        f_ppp_xxz: f_ppp_xxz.norm(),
        f_ppp_xzx: f_ppp_xzx.norm(),
        f_ppp_zxx: f_ppp_zxx.norm(),
        f_ppp_zzz: f_ppp_zzz.norm(),
    }
}

#[cfg(test)]
mod test {
    use super::{beam_fields, fresnel_factors, FresnelParams};

    fn index_matched() -> FresnelParams {
        FresnelParams {
            a_vis_deg: 60.,
            a_ir_deg: 55.,
            n_vis: [1.; 4],
            n_ir: [1.; 4],
            n_sfg: [1.; 4],
            lambda_vis_nm: 532.,
            lambda_ir_nm: 6000.,
            lambda_sfg_nm: 489.,
            film_thickness_nm: 0.,
        }
    }

    #[test]
    fn test_index_matched_local_fields_are_unity() {
        // with all indices equal and zero thickness nothing reflects
        let fields = beam_fields([1.; 4], 532., 0.5, 0.);

        assert!((fields.lxx.norm() - 1.).abs() < 1e-12);
        assert!((fields.lyy.norm() - 1.).abs() < 1e-12);
        assert!((fields.lzz.norm() - 1.).abs() < 1e-12);
        assert!(fields.lxx.im.abs() < 1e-12);
    }

    #[test]
    fn test_index_matched_ssp_reduces_to_geometry() {
        // all transmissions are unity, leaving only sin of the internal
        // IR propagation angle, which index matching makes equal to a_ir
        let factors = fresnel_factors(&index_matched());

        assert!((factors.f_ssp_yyz - 55.0_f64.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_factors_finite_for_prism_stack() {
        let params = FresnelParams {
            a_vis_deg: 60.,
            a_ir_deg: 55.,
            n_vis: [1., 1.43, 1.49, 1.33],
            n_ir: [1., 1.41, 1.45, 1.31],
            n_sfg: [1., 1.43, 1.49, 1.33],
            lambda_vis_nm: 532.,
            lambda_ir_nm: 6060.,
            lambda_sfg_nm: 489.,
            film_thickness_nm: 150.,
        };

        let factors = fresnel_factors(&params);

        for value in [
            factors.f_ssp_yyz,
            factors.f_ppp_xxz,
            factors.f_ppp_xzx,
            factors.f_ppp_zxx,
            factors.f_ppp_zzz,
        ] {
            assert!(value.is_finite());
            assert!(value > 0.);
        }
    }
}
