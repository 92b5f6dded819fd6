pub mod logger;
pub mod routing;

pub use logger::*;
pub use routing::*;
