pub mod cache;
pub mod cli;
pub mod config;
pub mod git;
pub mod model;

mod api;
#[cfg(test)]
mod testing;

pub use api::{Repofetch, RepofetchBuilder};
