pub mod intraday;
pub mod patterns;
pub mod technical;
pub mod volume;

pub use intraday::*;
pub use patterns::*;
pub use technical::*;
pub use volume::*;
