//! Material library loading

pub mod mtl_parser;

pub use mtl_parser::{MtlError, MtlParser};
