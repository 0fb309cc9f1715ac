pub mod annotation;
pub mod smi;

pub use annotation::*;
pub use smi::*;
