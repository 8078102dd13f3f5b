pub mod chi;
pub mod coupling;
pub mod error;
pub mod fresnel;
pub mod hamiltonian;
pub mod rotation;
pub mod spectrum;
pub mod sweep;

pub extern crate faer;
