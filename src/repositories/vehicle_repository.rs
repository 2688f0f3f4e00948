//! Repositorio de Vehicle
//!
//! Define el contrato de acceso a datos (`VehicleRepository`) y su
//! implementación sobre PostgreSQL. La implementación en memoria para
//! tests vive en `repositories::memory`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Vehicle;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

/// Campos por los que se permite filtrar con igualdad exacta.
///
/// Enum cerrado: el nombre de columna nunca viene del caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    Type,
    BrandName,
}

impl VehicleField {
    pub fn column(&self) -> &'static str {
        match self {
            VehicleField::Type => "type",
            VehicleField::BrandName => "brand_name",
        }
    }
}

/// Contrato de acceso a datos para la tabla vehicles.
///
/// `save` inserta cuando el vehículo no está persistido (id == 0),
/// asignando el id, y actualiza en caso contrario.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn save(&self, vehicle: Vehicle) -> Result<Vehicle, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError>;

    async fn find_by_model_code(&self, model_code: &str) -> Result<Option<Vehicle>, AppError>;

    async fn find_by_field(&self, field: VehicleField, value: &str)
        -> Result<Vec<Vehicle>, AppError>;

    /// Todos los vehículos ordenados por id descendente (más recientes primero),
    /// opcionalmente limitados a los `limit` primeros.
    async fn find_all_ordered(&self, limit: Option<i64>) -> Result<Vec<Vehicle>, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// El índice único sobre model_code es el respaldo contra la carrera
    /// check-then-insert; una violación se reporta como conflicto de dominio.
    fn map_save_error(e: sqlx::Error, model_code: &str) -> AppError {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                conflict_error("Vehicle", "model code", model_code)
            }
            _ => AppError::Database(e),
        }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn save(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        if !vehicle.is_persisted() {
            let saved = sqlx::query_as::<_, Vehicle>(
                r#"
                INSERT INTO vehicles (type, model_code, brand_name, launch_date)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(&vehicle.vehicle_type)
            .bind(&vehicle.model_code)
            .bind(&vehicle.brand_name)
            .bind(vehicle.launch_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_save_error(e, &vehicle.model_code))?;

            return Ok(saved);
        }

        let saved = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET type = $2, model_code = $3, brand_name = $4, launch_date = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.vehicle_type)
        .bind(&vehicle.model_code)
        .bind(&vehicle.brand_name)
        .bind(vehicle.launch_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_save_error(e, &vehicle.model_code))?;

        saved.ok_or_else(|| not_found_error("Vehicle", vehicle.id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_model_code(&self, model_code: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE model_code = $1")
            .bind(model_code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_field(
        &self,
        field: VehicleField,
        value: &str,
    ) -> Result<Vec<Vehicle>, AppError> {
        let sql = format!("SELECT * FROM vehicles WHERE {} = $1", field.column());

        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn find_all_ordered(&self, limit: Option<i64>) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = match limit {
            Some(n) => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id DESC LIMIT $1")
                    .bind(n)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(vehicles)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
