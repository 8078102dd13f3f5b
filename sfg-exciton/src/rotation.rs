use std::{
    fs::File,
    io::{BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
    sync::Mutex,
};

use faer::Mat;

use crate::error::SfgError;

/// Side of the 27×27 frame-rotation operator.
pub const TENSOR_DIM: usize = 27;

const BLOCK_LEN: usize = TENSOR_DIM * TENSOR_DIM;
const MAGIC: &[u8; 8] = b"SFGR3DB\0";

/// On-disk axis ordering of the 4-D array.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    /// Extents (n_tilt, n_twist, 27, 27): one contiguous block per cell.
    GridMajor,
    /// Extents (27, 27, n_twist, n_tilt): tensor components outermost.
    TensorMajor,
}

/// Precomputed frame-rotation operators on a discretized (tilt, twist)
/// grid, read on demand from a database file.
///
/// File format: `SFGR3DB\0` magic, u32-LE name length + UTF-8 array name,
/// four u64-LE extents, then the doubles in C row-major order (f64-LE).
/// Lookups share one file handle behind a mutex; the store is never
/// mutated after opening.
pub struct RotationStore {
    file: Mutex<File>,
    layout: Layout,
    n_tilt: usize,
    n_twist: usize,
    tilt_step: f64,
    twist_step: f64,
    data_offset: u64,
}

impl RotationStore {
    /// Opens a database and discovers grid spacing from the recorded
    /// extents. Anything but the recognized 1° and 10° grids is a fatal
    /// configuration error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SfgError> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(SfgError::BadMagic);
        }

        let name_len = read_u32(&mut file)? as usize;
        let mut name = vec![0u8; name_len];
        file.read_exact(&mut name)?;

        let mut dims = [0u64; 4];
        for dim in dims.iter_mut() {
            *dim = read_u64(&mut file)?;
        }

        let tensor = TENSOR_DIM as u64;
        let (layout, n_tilt, n_twist) = match dims {
            [n_tilt, n_twist, a, b] if a == tensor && b == tensor && is_tilt_extent(n_tilt) && is_twist_extent(n_twist) => {
                (Layout::GridMajor, n_tilt as usize, n_twist as usize)
            }
            [a, b, n_twist, n_tilt] if a == tensor && b == tensor && is_tilt_extent(n_tilt) && is_twist_extent(n_twist) => {
                (Layout::TensorMajor, n_tilt as usize, n_twist as usize)
            }
            _ => return Err(SfgError::UnrecognizedShape { dims }),
        };

        let data_offset = file.stream_position()?;
        let expected = (n_tilt * n_twist * BLOCK_LEN) as u64;
        let found = (file.metadata()?.len() - data_offset) / 8;
        if found < expected {
            return Err(SfgError::Truncated { expected, found });
        }

        Ok(Self {
            file: Mutex::new(file),
            layout,
            n_tilt,
            n_twist,
            tilt_step: 180.0 / (n_tilt - 1) as f64,
            twist_step: 360.0 / (n_twist - 1) as f64,
            data_offset,
        })
    }

    pub fn grid_extents(&self) -> (usize, usize) {
        (self.n_tilt, self.n_twist)
    }

    /// Nearest-grid-point rotation operator for the given orientation.
    ///
    /// Twist is wrapped modulo 360° into [0, 360); tilt is folded into
    /// [0, 180] so that −θ and +θ address the same grid cell. The rounded
    /// index is clamped at the grid edges. Both storage layouts normalize
    /// to the same in-memory matrix convention.
    pub fn lookup(&self, twist_deg: f64, tilt_deg: f64) -> Result<Mat<f64>, SfgError> {
        let twist = twist_deg.rem_euclid(360.0);
        let mut tilt = tilt_deg.rem_euclid(360.0);
        if tilt >= 180.0 {
            tilt = 360.0 - tilt;
        }

        let i_twist = ((twist / self.twist_step).round() as usize).min(self.n_twist - 1);
        let i_tilt = ((tilt / self.tilt_step).round() as usize).min(self.n_tilt - 1);

        let mut file = self.file.lock().expect("rotation store lock poisoned");

        match self.layout {
            Layout::GridMajor => {
                let cell = i_tilt * self.n_twist + i_twist;
                file.seek(SeekFrom::Start(self.data_offset + (cell * BLOCK_LEN * 8) as u64))?;

                let mut buf = vec![0u8; BLOCK_LEN * 8];
                file.read_exact(&mut buf)?;

                let block: Vec<f64> = buf
                    .chunks_exact(8)
                    .map(|bytes| f64::from_le_bytes(bytes.try_into().unwrap()))
                    .collect();

                // the stored (27, 27) block is transposed relative to the
                // in-memory row/column convention
                Ok(Mat::from_fn(TENSOR_DIM, TENSOR_DIM, |r, c| {
                    block[c * TENSOR_DIM + r]
                }))
            }
            Layout::TensorMajor => {
                let mut matrix = Mat::zeros(TENSOR_DIM, TENSOR_DIM);

                for c in 0..TENSOR_DIM {
                    for r in 0..TENSOR_DIM {
                        let index = ((c * TENSOR_DIM + r) * self.n_twist + i_twist)
                            * self.n_tilt
                            + i_tilt;

                        file.seek(SeekFrom::Start(self.data_offset + (index * 8) as u64))?;
                        let mut bytes = [0u8; 8];
                        file.read_exact(&mut bytes)?;

                        matrix[(r, c)] = f64::from_le_bytes(bytes);
                    }
                }

                Ok(matrix)
            }
        }
    }
}

fn is_tilt_extent(n: u64) -> bool {
    n == 19 || n == 181
}

fn is_twist_extent(n: u64) -> bool {
    n == 37 || n == 361
}

fn read_u32(file: &mut File) -> Result<u32, SfgError> {
    let mut bytes = [0u8; 4];
    file.read_exact(&mut bytes)?;

    Ok(u32::from_le_bytes(bytes))
}

fn read_u64(file: &mut File) -> Result<u64, SfgError> {
    let mut bytes = [0u8; 8];
    file.read_exact(&mut bytes)?;

    Ok(u64::from_le_bytes(bytes))
}

/// Writes a rotation database in the documented format; `data` is in C
/// row-major order over `dims`.
pub fn write_store(
    path: impl AsRef<Path>,
    name: &str,
    dims: [u64; 4],
    data: &[f64],
) -> Result<(), SfgError> {
    let expected: u64 = dims.iter().product();
    assert_eq!(data.len() as u64, expected, "data does not match extents");

    let mut file = BufWriter::new(File::create(path)?);

    file.write_all(MAGIC)?;
    file.write_all(&(name.len() as u32).to_le_bytes())?;
    file.write_all(name.as_bytes())?;
    for dim in dims {
        file.write_all(&dim.to_le_bytes())?;
    }
    for value in data {
        file.write_all(&value.to_le_bytes())?;
    }
    file.flush()?;

    Ok(())
}
