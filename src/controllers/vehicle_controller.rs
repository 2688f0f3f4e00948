use std::sync::Arc;

use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::repositories::VehicleRepository;
use crate::services::VehicleService;
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    service: VehicleService,
}

impl VehicleController {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self {
            service: VehicleService::new(repository),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        // Validar la forma de la request; el servicio revalida los invariantes
        request.validate()?;

        let vehicle = self
            .service
            .create_vehicle(
                request.vehicle_type,
                request.model_code,
                request.brand_name,
                request.launch_date,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<VehicleResponse, AppError> {
        // El servicio devuelve ausencia; la superficie HTTP la traduce a 404
        let vehicle = self
            .service
            .get_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self, count: Option<i32>) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.service.get_all_vehicles(count).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn list_by_type(&self, vehicle_type: &str) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.service.get_vehicles_by_type(vehicle_type).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn list_by_brand(&self, brand_name: &str) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.service.get_vehicles_by_brand(brand_name).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .service
            .update_vehicle(
                id,
                request.vehicle_type,
                request.model_code,
                request.brand_name,
                request.launch_date,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.service.delete_vehicle(id).await
    }
}
