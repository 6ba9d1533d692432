pub mod csv_service;
pub mod export_service;

pub use csv_service::*;
pub use export_service::*;
