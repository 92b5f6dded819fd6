pub mod context;
pub mod goal;
pub mod grid;
pub mod ports;
pub mod search;
pub mod types;

pub use context::*;
pub use goal::*;
pub use grid::*;
pub use ports::*;
pub use search::*;
pub use types::*;
