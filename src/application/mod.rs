pub mod routing_service;

pub use routing_service::*;
