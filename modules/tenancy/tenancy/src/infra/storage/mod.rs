pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repos;

pub use migrations::Migrator;
pub use repos::{SeaMetricsRepository, SeaTenantsRepository, SeaUsersRepository};
