mod metrics_sea_repo;
mod tenants_sea_repo;
mod users_sea_repo;

pub use metrics_sea_repo::SeaMetricsRepository;
pub use tenants_sea_repo::SeaTenantsRepository;
pub use users_sea_repo::SeaUsersRepository;
