//! Repositorio de Vehicle en memoria
//!
//! Implementación del contrato `VehicleRepository` sobre un HashMap
//! protegido por un único mutex, que emula la frontera transaccional
//! de la base de datos. Usado por los tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::Vehicle;
use crate::repositories::vehicle_repository::{VehicleField, VehicleRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

#[derive(Default)]
struct Inner {
    rows: HashMap<i64, Vehicle>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    inner: Mutex<Inner>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save(&self, mut vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let mut inner = self.inner.lock().await;

        // Emula el índice único sobre model_code
        let collision = inner
            .rows
            .values()
            .any(|v| v.model_code == vehicle.model_code && v.id != vehicle.id);
        if collision {
            return Err(conflict_error("Vehicle", "model code", &vehicle.model_code));
        }

        if !vehicle.is_persisted() {
            inner.next_id += 1;
            vehicle.id = inner.next_id;
        } else if !inner.rows.contains_key(&vehicle.id) {
            return Err(not_found_error("Vehicle", vehicle.id));
        }

        inner.rows.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_model_code(&self, model_code: &str) -> Result<Option<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .rows
            .values()
            .find(|v| v.model_code == model_code)
            .cloned())
    }

    async fn find_by_field(
        &self,
        field: VehicleField,
        value: &str,
    ) -> Result<Vec<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        let vehicles = inner
            .rows
            .values()
            .filter(|v| match field {
                VehicleField::Type => v.vehicle_type == value,
                VehicleField::BrandName => v.brand_name.as_deref() == Some(value),
            })
            .cloned()
            .collect();

        Ok(vehicles)
    }

    async fn find_all_ordered(&self, limit: Option<i64>) -> Result<Vec<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        let mut vehicles: Vec<Vehicle> = inner.rows.values().cloned().collect();
        vehicles.sort_by(|a, b| b.id.cmp(&a.id));

        if let Some(n) = limit {
            vehicles.truncate(n.max(0) as usize);
        }

        Ok(vehicles)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(code: &str) -> Vehicle {
        Vehicle::new("SUV".to_string(), code.to_string(), None, None)
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let repo = InMemoryVehicleRepository::new();

        let v1 = repo.save(vehicle("A1")).await.unwrap();
        let v2 = repo.save(vehicle("A2")).await.unwrap();

        assert_eq!(v1.id, 1);
        assert_eq!(v2.id, 2);
    }

    #[tokio::test]
    async fn save_rejects_duplicate_model_code() {
        let repo = InMemoryVehicleRepository::new();

        repo.save(vehicle("A1")).await.unwrap();
        let err = repo.save(vehicle("A1")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_all_ordered_returns_most_recent_first() {
        let repo = InMemoryVehicleRepository::new();

        repo.save(vehicle("A1")).await.unwrap();
        repo.save(vehicle("A2")).await.unwrap();
        repo.save(vehicle("A3")).await.unwrap();

        let all = repo.find_all_ordered(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let limited = repo.find_all_ordered(Some(2)).await.unwrap();
        let ids: Vec<i64> = limited.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn find_by_field_matches_exactly() {
        let repo = InMemoryVehicleRepository::new();

        let mut suv = vehicle("A1");
        suv.brand_name = Some("Brand1".to_string());
        repo.save(suv).await.unwrap();

        let mut sedan = vehicle("A2");
        sedan.vehicle_type = "Sedan".to_string();
        repo.save(sedan).await.unwrap();

        let suvs = repo.find_by_field(VehicleField::Type, "SUV").await.unwrap();
        assert_eq!(suvs.len(), 1);
        assert_eq!(suvs[0].model_code, "A1");

        let branded = repo
            .find_by_field(VehicleField::BrandName, "Brand1")
            .await
            .unwrap();
        assert_eq!(branded.len(), 1);

        let none = repo
            .find_by_field(VehicleField::BrandName, "Other")
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = InMemoryVehicleRepository::new();

        let saved = repo.save(vehicle("A1")).await.unwrap();
        assert!(repo.exists_by_id(saved.id).await.unwrap());

        repo.delete_by_id(saved.id).await.unwrap();
        assert!(!repo.exists_by_id(saved.id).await.unwrap());
    }
}
