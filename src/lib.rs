#![crate_type = "lib"]
#![crate_name = "quarry"]

pub mod common;
pub mod query;
pub mod types;
