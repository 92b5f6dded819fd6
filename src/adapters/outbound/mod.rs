pub mod console_logger;
pub mod file_logger;
pub mod venue_data;

pub use console_logger::*;
pub use file_logger::*;
pub use venue_data::*;
