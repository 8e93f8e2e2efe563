#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the arrest map dashboard.
//!
//! Serves the choropleth data (summary, fills, decorated state boundaries,
//! ranked table, tooltips, media) and the admin write endpoints, plus the
//! static frontend from `app/dist`. Admin identity is taken from the
//! `X-Forwarded-Email` header set by the authenticating proxy in front of
//! the server.
//!
//! Dashboard data is held as an immutable snapshot that is rebuilt from the
//! document store at startup and after every successful write.

pub mod config;
mod errors;
mod handlers;
pub mod interactive;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use arrest_map_admin::{AdminIdentity, AdminService};
use arrest_map_region::boundary::BoundarySet;
use arrest_map_stats::{DashboardStore, Snapshot};
use arrest_map_stats_models::RawRecord;
use arrest_map_store::{DocumentStore, SqliteDocumentStore};

pub use config::ServerConfig;
pub use handlers::EMAIL_HEADER;

/// Shared application state.
pub struct AppState {
    dashboard: RwLock<DashboardStore>,
    loads: AtomicU64,
    boundaries: Option<BoundarySet>,
    admin: AdminService,
}

impl AppState {
    /// Creates state holding an empty snapshot. Call [`Self::refresh`] to
    /// load data.
    #[must_use]
    pub fn new(admin: AdminService, boundaries: Option<BoundarySet>) -> Self {
        Self {
            dashboard: RwLock::new(DashboardStore::new()),
            loads: AtomicU64::new(0),
            boundaries,
            admin,
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.dashboard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Reloads every record and swaps in a new snapshot. A failed read is
    /// shown as empty data.
    ///
    /// Concurrent refreshes may finish in any order; the snapshot always
    /// reflects the most recently started load that has finished.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let generation = self.begin_load();
        let records = match self.admin.load_records().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Could not load records, showing empty data: {e}");
                Vec::new()
            }
        };

        self.finish_load(generation, records)
    }

    /// Numbers a load. Must be called before reading the store.
    fn begin_load(&self) -> u64 {
        self.loads.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn finish_load(&self, generation: u64, records: Vec<RawRecord>) -> Arc<Snapshot> {
        self.dashboard
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(generation, records)
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(errors::json_error))
            .route("/health", web::get().to(handlers::health))
            .route("/regions", web::get().to(handlers::regions))
            .route("/map", web::get().to(handlers::map))
            .route("/boundaries", web::get().to(handlers::boundaries))
            .route("/table", web::get().to(handlers::table))
            .route("/tooltip/{name}", web::get().to(handlers::tooltip))
            .route("/media", web::get().to(handlers::media))
            .route("/admin/records", web::post().to(handlers::set_counts))
            .route(
                "/admin/records/{region}",
                web::delete().to(handlers::delete_record),
            )
            .route("/admin/batch", web::post().to(handlers::batch))
            .route("/admin/media", web::post().to(handlers::add_media))
            .route("/admin/media/{id}", web::delete().to(handlers::delete_media)),
    );
}

/// Opens the document store, or returns `None` (logged) if it cannot be
/// opened. Without a store the dashboard is empty and writes answer 503.
pub async fn open_store(config: &ServerConfig) -> Option<Arc<dyn DocumentStore>> {
    match SqliteDocumentStore::open(&config.db_path).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            log::error!(
                "Failed to open document store at {}: {e}",
                config.db_path.display()
            );
            None
        }
    }
}

/// Loads the boundary dataset, or returns `None` (logged) if it is missing
/// or malformed.
#[must_use]
pub fn load_boundaries(config: &ServerConfig) -> Option<BoundarySet> {
    match BoundarySet::load(&config.boundaries_path) {
        Ok(set) => {
            for name in set.unmatched_names() {
                log::warn!("Boundary feature {name:?} has no region and will not be colored");
            }
            Some(set)
        }
        Err(e) => {
            log::warn!(
                "Failed to load boundaries from {}: {e}",
                config.boundaries_path.display()
            );
            None
        }
    }
}

/// Starts the arrest map API server.
///
/// Reads [`ServerConfig`] from the environment, opens the document store,
/// loads the boundary dataset, builds the first snapshot, and starts the
/// Actix-Web HTTP server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = ServerConfig::from_env();

    log::info!("Opening document store...");
    let store = open_store(&config).await;

    log::info!("Loading boundaries...");
    let boundaries = load_boundaries(&config);

    let admin = AdminService::new(store, AdminIdentity::from_env());
    let state = web::Data::new(AppState::new(admin, boundaries));

    let snapshot = state.refresh().await;
    log::info!(
        "Loaded {} arrests and {} FIRs across {} regions",
        snapshot.summary.total_arrests,
        snapshot.summary.total_fir,
        snapshot.summary.regions_with_data
    );

    let ServerConfig {
        bind_addr, port, ..
    } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
