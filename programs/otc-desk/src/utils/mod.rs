pub mod math;
pub mod pricing;

pub use math::*;
pub use pricing::*;
