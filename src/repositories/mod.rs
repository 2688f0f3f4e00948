pub mod memory;
pub mod vehicle_repository;

pub use memory::InMemoryVehicleRepository;
pub use vehicle_repository::{PgVehicleRepository, VehicleField, VehicleRepository};
