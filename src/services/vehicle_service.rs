//! Servicio de Vehicle
//!
//! Única autoridad sobre los invariantes de Vehicle: unicidad de
//! model_code, validación de fechas y semántica de partial update.
//! Es el único componente que muta el store.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::Vehicle;
use crate::repositories::{VehicleField, VehicleRepository};
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppError};

pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    /// Crear un vehículo nuevo.
    ///
    /// El chequeo de duplicado es una búsqueda explícita para que el error
    /// sea de dominio; el índice único del store queda como respaldo ante
    /// escrituras concurrentes.
    pub async fn create_vehicle(
        &self,
        vehicle_type: String,
        model_code: String,
        brand_name: Option<String>,
        launch_date: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let vehicle_type = vehicle_type.trim().to_string();
        if vehicle_type.is_empty() {
            return Err(validation_error("Vehicle type is required"));
        }

        let model_code = model_code.trim().to_string();
        if model_code.is_empty() {
            return Err(validation_error("Model code is required"));
        }

        if self.repository.find_by_model_code(&model_code).await?.is_some() {
            return Err(conflict_error("Vehicle", "model code", &model_code));
        }

        let launch_date = parse_launch_date(launch_date.as_deref())?;

        let vehicle = Vehicle::new(vehicle_type, model_code, brand_name, launch_date);
        self.repository.save(vehicle).await
    }

    /// Búsqueda pura: ausencia no es un error en esta capa.
    pub async fn get_vehicle(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Todos los vehículos, más recientes primero (id descendente).
    ///
    /// `count` ausente o <= 0 devuelve todos; un `count` positivo devuelve
    /// los `count` más recientes, no un prefijo arbitrario.
    pub async fn get_all_vehicles(&self, count: Option<i32>) -> Result<Vec<Vehicle>, AppError> {
        let limit = count.filter(|c| *c > 0).map(i64::from);
        self.repository.find_all_ordered(limit).await
    }

    pub async fn get_vehicles_by_type(&self, vehicle_type: &str) -> Result<Vec<Vehicle>, AppError> {
        self.repository
            .find_by_field(VehicleField::Type, vehicle_type)
            .await
    }

    pub async fn get_vehicles_by_brand(&self, brand_name: &str) -> Result<Vec<Vehicle>, AppError> {
        self.repository
            .find_by_field(VehicleField::BrandName, brand_name)
            .await
    }

    /// Partial update: cada argumento presente reemplaza el campo
    /// correspondiente; los ausentes dejan el valor actual. La semántica es
    /// por presencia, así que no puede expresar "limpiar este campo".
    pub async fn update_vehicle(
        &self,
        id: i64,
        vehicle_type: Option<String>,
        model_code: Option<String>,
        brand_name: Option<String>,
        launch_date: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let mut vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        if let Some(new_type) = vehicle_type {
            let new_type = new_type.trim().to_string();
            if new_type.is_empty() {
                return Err(validation_error("Vehicle type cannot be blank"));
            }
            vehicle.vehicle_type = new_type;
        }

        if let Some(new_code) = model_code {
            let new_code = new_code.trim().to_string();
            if new_code.is_empty() {
                return Err(validation_error("Model code cannot be blank"));
            }
            if new_code != vehicle.model_code {
                if let Some(other) = self.repository.find_by_model_code(&new_code).await? {
                    if other.id != id {
                        return Err(conflict_error("Vehicle", "model code", &new_code));
                    }
                }
                vehicle.model_code = new_code;
            }
        }

        if let Some(new_brand) = brand_name {
            vehicle.brand_name = Some(new_brand);
        }

        if let Some(date) = parse_launch_date(launch_date.as_deref())? {
            vehicle.launch_date = Some(date);
        }

        self.repository.save(vehicle).await
    }

    /// Eliminar un vehículo existente; devuelve `true` como confirmación.
    pub async fn delete_vehicle(&self, id: i64) -> Result<bool, AppError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(not_found_error("Vehicle", id));
        }

        self.repository.delete_by_id(id).await?;
        Ok(true)
    }
}

/// Parsear una fecha de lanzamiento ISO 8601 (`YYYY-MM-DD`).
///
/// Ausente o en blanco significa "campo no establecido"; un valor
/// malformado falla la operación completa antes de persistir nada.
fn parse_launch_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw {
        Some(s) if !s.trim().is_empty() => {
            let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                validation_error(&format!(
                    "Invalid launch date '{}': expected format YYYY-MM-DD",
                    s.trim()
                ))
            })?;
            Ok(Some(date))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryVehicleRepository;

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(InMemoryVehicleRepository::new()))
    }

    async fn create_sample(service: &VehicleService, code: &str) -> Vehicle {
        service
            .create_vehicle(
                "SUV".to_string(),
                code.to_string(),
                Some("Brand1".to_string()),
                Some("2023-01-01".to_string()),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let service = service();

        let v1 = create_sample(&service, "TEST001").await;
        let v2 = create_sample(&service, "TEST002").await;
        let v3 = create_sample(&service, "TEST003").await;

        assert_eq!(v1.id, 1);
        assert_eq!(v2.id, 2);
        assert_eq!(v3.id, 3);
        assert_eq!(v1.vehicle_type, "SUV");
        assert_eq!(v1.model_code, "TEST001");
        assert_eq!(v1.brand_name.as_deref(), Some("Brand1"));
        assert_eq!(
            v1.launch_date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        );
    }

    #[tokio::test]
    async fn create_rejects_duplicate_model_code() {
        let service = service();

        create_sample(&service, "TEST001").await;
        let err = service
            .create_vehicle("Sedan".to_string(), "TEST001".to_string(), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.get_all_vehicles(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_required_fields() {
        let service = service();

        let err = service
            .create_vehicle("  ".to_string(), "TEST001".to_string(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service
            .create_vehicle("SUV".to_string(), "".to_string(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_malformed_launch_date() {
        let service = service();

        let err = service
            .create_vehicle(
                "SUV".to_string(),
                "TEST001".to_string(),
                None,
                Some("01/01/2023".to_string()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        // Nada persistido
        assert!(service.get_all_vehicles(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_treats_blank_launch_date_as_unset() {
        let service = service();

        let vehicle = service
            .create_vehicle(
                "SUV".to_string(),
                "TEST001".to_string(),
                None,
                Some("   ".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(vehicle.launch_date, None);
    }

    #[tokio::test]
    async fn get_vehicle_absent_is_not_an_error() {
        let service = service();

        assert!(service.get_vehicle(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_all_returns_most_recent_first() {
        let service = service();

        create_sample(&service, "TEST001").await;
        create_sample(&service, "TEST002").await;
        create_sample(&service, "TEST003").await;

        let all = service.get_all_vehicles(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let two = service.get_all_vehicles(Some(2)).await.unwrap();
        let ids: Vec<i64> = two.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn get_all_ignores_non_positive_count() {
        let service = service();

        create_sample(&service, "TEST001").await;
        create_sample(&service, "TEST002").await;

        assert_eq!(service.get_all_vehicles(Some(0)).await.unwrap().len(), 2);
        assert_eq!(service.get_all_vehicles(Some(-5)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filters_by_type_and_brand() {
        let service = service();

        create_sample(&service, "TEST001").await;
        service
            .create_vehicle(
                "Sedan".to_string(),
                "TEST002".to_string(),
                Some("Brand2".to_string()),
                None,
            )
            .await
            .unwrap();

        let suvs = service.get_vehicles_by_type("SUV").await.unwrap();
        assert_eq!(suvs.len(), 1);
        assert_eq!(suvs[0].model_code, "TEST001");

        let brand2 = service.get_vehicles_by_brand("Brand2").await.unwrap();
        assert_eq!(brand2.len(), 1);
        assert_eq!(brand2[0].model_code, "TEST002");
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_noop() {
        let service = service();

        let original = create_sample(&service, "TEST001").await;
        let updated = service
            .update_vehicle(original.id, None, None, None, None)
            .await
            .unwrap();

        assert_eq!(updated, original);
    }

    #[tokio::test]
    async fn update_replaces_only_supplied_fields() {
        let service = service();

        let original = create_sample(&service, "TEST001").await;
        let updated = service
            .update_vehicle(original.id, Some("Sedan".to_string()), None, None, None)
            .await
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.vehicle_type, "Sedan");
        assert_eq!(updated.model_code, "TEST001");
        assert_eq!(updated.brand_name.as_deref(), Some("Brand1"));
        assert_eq!(updated.launch_date, original.launch_date);
    }

    #[tokio::test]
    async fn update_missing_vehicle_is_not_found() {
        let service = service();

        let err = service
            .update_vehicle(99, Some("Sedan".to_string()), None, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rename_into_existing_code_conflicts() {
        let service = service();

        let first = create_sample(&service, "TEST001").await;
        service
            .create_vehicle("Sedan".to_string(), "TEST002".to_string(), None, None)
            .await
            .unwrap();

        let err = service
            .update_vehicle(first.id, None, Some("TEST002".to_string()), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // El registro original queda intacto
        let unchanged = service.get_vehicle(first.id).await.unwrap().unwrap();
        assert_eq!(unchanged, first);
    }

    #[tokio::test]
    async fn update_keeping_own_code_is_allowed() {
        let service = service();

        let vehicle = create_sample(&service, "TEST001").await;
        let updated = service
            .update_vehicle(
                vehicle.id,
                Some("Sedan".to_string()),
                Some("TEST001".to_string()),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.model_code, "TEST001");
        assert_eq!(updated.vehicle_type, "Sedan");
    }

    #[tokio::test]
    async fn update_with_malformed_date_changes_nothing() {
        let service = service();

        let original = create_sample(&service, "TEST001").await;
        let err = service
            .update_vehicle(
                original.id,
                Some("Sedan".to_string()),
                None,
                None,
                Some("not-a-date".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unchanged = service.get_vehicle(original.id).await.unwrap().unwrap();
        assert_eq!(unchanged, original);
    }

    #[tokio::test]
    async fn delete_missing_vehicle_is_not_found() {
        let service = service();

        create_sample(&service, "TEST001").await;
        let err = service.delete_vehicle(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(service.get_all_vehicles(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn full_lifecycle_scenario() {
        let service = service();

        // create
        let created = create_sample(&service, "TEST001").await;
        assert_eq!(created.id, 1);

        // create con el mismo model_code
        let err = service
            .create_vehicle("Sedan".to_string(), "TEST001".to_string(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // partial update: solo el tipo cambia
        let updated = service
            .update_vehicle(created.id, Some("Sedan".to_string()), None, None, None)
            .await
            .unwrap();
        assert_eq!(updated.vehicle_type, "Sedan");
        assert_eq!(updated.model_code, "TEST001");
        assert_eq!(updated.brand_name.as_deref(), Some("Brand1"));
        assert_eq!(
            updated.launch_date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        );

        // delete dos veces
        assert!(service.delete_vehicle(created.id).await.unwrap());
        let err = service.delete_vehicle(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
