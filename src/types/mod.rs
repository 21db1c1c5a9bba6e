pub mod dataset;
pub mod fix;

pub use dataset::*;
pub use fix::*;
