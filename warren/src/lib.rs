#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub use crate::error::WarrenError;

pub type Result<T> = std::result::Result<T, WarrenError>;
pub const JSON_API_HEADER: &str = "application/vnd.api+json";

pub mod display;
pub mod error;
pub mod model;
pub mod operation;
pub mod query;
pub mod render;
pub mod resolve;
