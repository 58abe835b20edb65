// Library exports for Vitrine
// This allows integration tests and external code to use Vitrine modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod extractors;
pub mod images;
pub mod routes;
pub mod state;
