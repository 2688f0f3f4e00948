//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle que mapea exactamente
//! a la tabla `vehicles` con primary key `id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
///
/// `id == 0` significa "todavía no persistido"; el store asigna el id
/// real en el primer `save` y nunca lo reasigna.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub model_code: String,
    pub brand_name: Option<String>,
    pub launch_date: Option<NaiveDate>,
}

impl Vehicle {
    /// Crear un vehículo todavía no persistido (id pendiente de asignar)
    pub fn new(
        vehicle_type: String,
        model_code: String,
        brand_name: Option<String>,
        launch_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: 0,
            vehicle_type,
            model_code,
            brand_name,
            launch_date,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
