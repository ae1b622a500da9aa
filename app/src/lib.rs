//! Demo service: one route per binding shape

pub mod controllers;
pub mod models;
pub mod routes;
pub mod telemetry;

pub use routes::router;
