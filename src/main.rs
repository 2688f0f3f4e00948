use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use vehicle_catalog::config::environment::EnvironmentConfig;
use vehicle_catalog::database;
use vehicle_catalog::repositories::PgVehicleRepository;
use vehicle_catalog::routes::create_router;
use vehicle_catalog::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Catalog Service");
    info!("==========================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    database::run_migrations(&pool).await?;
    info!("✅ Schema de vehicles verificado");

    // Crear router de la API
    let repository = Arc::new(PgVehicleRepository::new(pool));
    let state = AppState::new(repository, config.clone());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Endpoints MVC - Vehicle:");
    info!("   POST   /api/vehicle - Crear vehículo");
    info!("   GET    /api/vehicle?count=N - Listar vehículos (más recientes primero)");
    info!("   GET    /api/vehicle/:id - Obtener vehículo");
    info!("   GET    /api/vehicle/type/:type - Vehículos por tipo");
    info!("   GET    /api/vehicle/brand/:brand - Vehículos por marca");
    info!("   PUT    /api/vehicle/:id - Actualizar vehículo (partial update)");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
