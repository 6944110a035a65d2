pub mod error;
pub mod features;
pub mod math;
pub mod types;

pub use error::*;
pub use features::*;
pub use math::*;
pub use types::*;
