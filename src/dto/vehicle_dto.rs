use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Vehicle;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,

    #[validate(length(min = 1, message = "Model code is required"))]
    pub model_code: String,

    pub brand_name: Option<String>,

    /// Fecha ISO 8601 `YYYY-MM-DD`; ausente o en blanco = sin establecer
    pub launch_date: Option<String>,
}

// Request para actualizar un vehículo (todos los campos opcionales)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub model_code: Option<String>,
    pub brand_name: Option<String>,
    pub launch_date: Option<String>,
}

// Parámetros de listado
#[derive(Debug, Deserialize)]
pub struct ListVehiclesQuery {
    pub count: Option<i32>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub model_code: String,
    pub brand_name: Option<String>,
    pub launch_date: Option<NaiveDate>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_type: vehicle.vehicle_type,
            model_code: vehicle.model_code,
            brand_name: vehicle.brand_name,
            launch_date: vehicle.launch_date,
        }
    }
}
