use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, ListVehiclesQuery, UpdateVehicleRequest, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .route("/type/:vehicle_type", get(list_vehicles_by_type))
        .route("/brand/:brand_name", get(list_vehicles_by_brand))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<ListVehiclesQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.list(query.count).await?;
    Ok(Json(response))
}

async fn list_vehicles_by_type(
    State(state): State<AppState>,
    Path(vehicle_type): Path<String>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.list_by_type(&vehicle_type).await?;
    Ok(Json(response))
}

async fn list_vehicles_by_brand(
    State(state): State<AppState>,
    Path(brand_name): Path<String>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.list_by_brand(&brand_name).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.repository.clone());
    let deleted = controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": deleted,
        "message": "Vehicle deleted successfully"
    })))
}
