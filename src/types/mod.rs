pub mod line;
pub mod record;
pub mod trip;

pub use line::*;
pub use record::*;
pub use trip::*;
