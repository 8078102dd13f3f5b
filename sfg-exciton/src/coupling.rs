use amide::geometry::Vec3;

/// Point-dipole coupling between two oscillator sites.
#[derive(Debug, Clone, Copy)]
pub struct DipoleCoupling {
    pub prefactor: f64,
    /// Separation beyond which the coupling is zeroed, in Å.
    pub cutoff: Option<f64>,
}

impl DipoleCoupling {
    /// Amide-I coupling strength in cm⁻¹ for dipoles in the transition
    /// dipole-moment convention of the source parametrization.
    pub fn amide_one(cutoff: Option<f64>) -> Self {
        let prefactor = 5034.0 * ((4.1058 / 1600.0_f64.sqrt()) * 3.144).powi(2);

        Self { prefactor, cutoff }
    }

    /// β = prefactor · (μᵢ·μⱼ/|r|³ − 3(r·μᵢ)(r·μⱼ)/|r|⁵) with `r = Rᵢ − Rⱼ`.
    ///
    /// Coincident sites and separations beyond the cutoff couple with
    /// exactly zero strength; no input is an error.
    pub fn between(&self, mu_i: Vec3, mu_j: Vec3, r: Vec3) -> f64 {
        let r2 = r.norm_squared();
        if r2 == 0. {
            return 0.;
        }

        let distance = r2.sqrt();
        if let Some(cutoff) = self.cutoff {
            if distance > cutoff {
                return 0.;
            }
        }

        let r3 = r2 * distance;
        let r5 = r3 * r2;

        self.prefactor * (mu_i.dot(mu_j) / r3 - 3.0 * r.dot(mu_i) * r.dot(mu_j) / r5)
    }
}
