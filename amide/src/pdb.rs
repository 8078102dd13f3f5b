use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{error::AmideError, geometry::Vec3};

/// One atom record from a structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub serial: i32,
    pub name: String,
    pub res_id: i32,
    pub position: Vec3,
}

/// Reads `ATOM`/`HETATM` records from a PDB file in file order.
pub fn read_pdb_atoms(path: impl AsRef<Path>) -> Result<Vec<Atom>, AmideError> {
    let file = File::open(path)?;

    parse_pdb_atoms(BufReader::new(file))
}

pub fn parse_pdb_atoms(reader: impl BufRead) -> Result<Vec<Atom>, AmideError> {
    let mut atoms = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.len() < 54 {
            continue;
        }
        if !line.starts_with("ATOM") && !line.starts_with("HETATM") {
            continue;
        }

        let line_no = index + 1;
        let field = |range: std::ops::Range<usize>| line[range].trim();

        let serial = parse_field(field(6..11), "atom serial", line_no)?;
        let name = field(12..16).to_string();
        let res_id = parse_field(field(22..26), "residue id", line_no)?;

        let x = parse_field(field(30..38), "x coordinate", line_no)?;
        let y = parse_field(field(38..46), "y coordinate", line_no)?;
        let z = parse_field(field(46..54), "z coordinate", line_no)?;

        atoms.push(Atom {
            serial,
            name,
            res_id,
            position: Vec3::new(x, y, z),
        });
    }

    Ok(atoms)
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    what: &str,
    line: usize,
) -> Result<T, AmideError> {
    value.parse().map_err(|_| AmideError::Pdb {
        line,
        reason: format!("cannot parse {what} from {value:?}"),
    })
}
