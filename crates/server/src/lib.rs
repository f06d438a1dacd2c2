pub mod errors;
pub mod extract;
pub mod pages;
pub mod resources;
pub mod routes;
pub mod startup;

pub use startup::{run, serve};
