pub mod amide_unit;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pdb;
pub mod sites;
pub mod utility;
