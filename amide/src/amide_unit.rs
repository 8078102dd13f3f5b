use crate::{geometry::Vec3, pdb::Atom};

/// Backbone C=O / C–N triplet of one amide group.
#[derive(Debug, Clone)]
pub struct AmideUnit {
    pub c: Atom,
    pub o: Atom,
    pub n: Atom,
}

/// Collects amide C/O/N triplets in file order.
///
/// For every backbone `C` the next `O` record is taken as the carbonyl
/// oxygen and the next `N` (or terminal `OXT`) after it as the amide
/// nitrogen. Incomplete triplets at the chain end are dropped.
pub fn extract_amide_units(atoms: &[Atom]) -> Vec<AmideUnit> {
    let mut units = Vec::new();

    for (i, c) in atoms.iter().enumerate() {
        if c.name != "C" {
            continue;
        }

        let Some(o_offset) = atoms[i + 1..].iter().position(|a| a.name == "O") else {
            continue;
        };
        let o_index = i + 1 + o_offset;

        let Some(n_offset) = atoms[o_index + 1..]
            .iter()
            .position(|a| a.name == "N" || a.name == "OXT")
        else {
            continue;
        };
        let n_index = o_index + 1 + n_offset;

        units.push(AmideUnit {
            c: c.clone(),
            o: atoms[o_index].clone(),
            n: atoms[n_index].clone(),
        });
    }

    units
}

/// Unit bond vectors and the transition-dipole center of one amide group.
#[derive(Debug, Clone, Copy)]
pub struct AmideGeometry {
    pub co_unit: Vec3,
    pub cn_unit: Vec3,
    pub center: Vec3,
}

/// Fractional position of the vibrational center along the C=O bond.
const CENTER_ALONG_CO: f64 = 0.665;
/// Fractional position of the vibrational center along the C–N bond.
const CENTER_ALONG_CN: f64 = 0.256;

pub fn amide_geometry(unit: &AmideUnit) -> AmideGeometry {
    let c = unit.c.position;
    let co_unit = (unit.o.position - c).normalized();
    let cn_unit = (unit.n.position - c).normalized();

    AmideGeometry {
        co_unit,
        cn_unit,
        center: c + co_unit * CENTER_ALONG_CO + cn_unit * CENTER_ALONG_CN,
    }
}

/// Right-handed local coordinate frame of one amide group.
///
/// z lies along the C=O bond, x is normal to the O=C–N plane and y
/// completes the frame. Degenerate (collinear) bond geometry produces
/// zero axes instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

pub fn local_frame(geometry: &AmideGeometry) -> LocalFrame {
    let z_axis = geometry.co_unit;
    let x_axis = z_axis.cross(geometry.cn_unit).normalized();
    let y_axis = x_axis.cross(z_axis);

    LocalFrame {
        x_axis,
        y_axis,
        z_axis,
    }
}

#[cfg(test)]
mod test {
    use super::{amide_geometry, extract_amide_units, local_frame, AmideUnit};
    use crate::{geometry::Vec3, pdb::Atom};

    fn atom(serial: i32, name: &str, position: Vec3) -> Atom {
        Atom {
            serial,
            name: name.to_string(),
            res_id: 1,
            position,
        }
    }

    fn planar_unit() -> AmideUnit {
        AmideUnit {
            c: atom(1, "C", Vec3::ZERO),
            o: atom(2, "O", Vec3::new(0., 0., 1.23)),
            n: atom(3, "N", Vec3::new(0., 1.2, -0.5)),
        }
    }

    #[test]
    fn test_extraction_order() {
        let atoms = vec![
            atom(1, "N", Vec3::ZERO),
            atom(2, "CA", Vec3::ZERO),
            atom(3, "C", Vec3::ZERO),
            atom(4, "O", Vec3::new(0., 0., 1.)),
            atom(5, "N", Vec3::new(0., 1., 0.)),
            atom(6, "C", Vec3::new(1., 0., 0.)),
            atom(7, "O", Vec3::new(1., 0., 1.)),
            atom(8, "OXT", Vec3::new(1., 1., 0.)),
        ];

        let units = extract_amide_units(&atoms);

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].c.serial, 3);
        assert_eq!(units[0].n.serial, 5);
        assert_eq!(units[1].n.name, "OXT");
    }

    #[test]
    fn test_incomplete_triplet_dropped() {
        let atoms = vec![atom(1, "C", Vec3::ZERO), atom(2, "O", Vec3::new(0., 0., 1.))];

        assert!(extract_amide_units(&atoms).is_empty());
    }

    #[test]
    fn test_geometry_center() {
        let geo = amide_geometry(&planar_unit());

        assert!((geo.co_unit.norm() - 1.).abs() < 1e-12);
        assert!((geo.cn_unit.norm() - 1.).abs() < 1e-12);

        let expected = geo.co_unit * 0.665 + geo.cn_unit * 0.256;
        assert!((geo.center - expected).norm() < 1e-12);
    }

    #[test]
    fn test_local_frame_orthonormal() {
        let geo = amide_geometry(&planar_unit());
        let frame = local_frame(&geo);

        assert!((frame.x_axis.norm() - 1.).abs() < 1e-12);
        assert!((frame.y_axis.norm() - 1.).abs() < 1e-12);
        assert!((frame.z_axis.norm() - 1.).abs() < 1e-12);
        assert!(frame.x_axis.dot(frame.y_axis).abs() < 1e-12);
        assert!(frame.x_axis.dot(frame.z_axis).abs() < 1e-12);
        assert!(frame.y_axis.dot(frame.z_axis).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_frame_is_zero() {
        let unit = AmideUnit {
            c: atom(1, "C", Vec3::ZERO),
            o: atom(2, "O", Vec3::new(0., 0., 1.)),
            n: atom(3, "N", Vec3::new(0., 0., 2.)),
        };
        let frame = local_frame(&amide_geometry(&unit));

        assert_eq!(frame.x_axis, Vec3::ZERO);
    }
}
