//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use mallhub_auth::password::{PasswordHasher, PasswordValidator};
use mallhub_auth::{JwtDecoder, JwtEncoder};
use mallhub_core::config::AppConfig;
use mallhub_core::traits::TtlStore;
use mallhub_database::store::Database;
use mallhub_service::{
    AddressService, AdminService, BannerService, Mailer, MessageService, NotificationService,
    ReportService, ResetService, Telephone, UnitOfWork, UploadService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// TTL store holding one-time codes
    pub ttl: Arc<dyn TtlStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub reset_service: Arc<ResetService>,
    pub address_service: Arc<AddressService>,
    pub banner_service: Arc<BannerService>,
    pub message_service: Arc<MessageService>,
    pub notification_service: Arc<NotificationService>,
    pub report_service: Arc<ReportService>,
    pub admin_service: Arc<AdminService>,
    pub upload_service: Arc<UploadService>,
}

impl AppState {
    /// Wires every service over the given infrastructure.
    pub fn new(
        config: AppConfig,
        db: Arc<dyn Database>,
        ttl: Arc<dyn TtlStore>,
        mailer: Arc<dyn Mailer>,
        telephone: Arc<dyn Telephone>,
    ) -> Self {
        let uow = UnitOfWork::new(db, &config.unit_of_work);

        let hasher = Arc::new(PasswordHasher::new());
        let passwords = Arc::new(PasswordValidator::new(&config.auth));
        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let user_service = Arc::new(UserService::new(
            uow.clone(),
            Arc::clone(&ttl),
            Arc::clone(&hasher),
            Arc::clone(&passwords),
            Arc::clone(&encoder),
        ));
        let reset_service = Arc::new(ResetService::new(
            uow.clone(),
            Arc::clone(&ttl),
            mailer,
            telephone,
            &config.email,
            &config.telephone,
        ));
        let admin_service = Arc::new(AdminService::new(
            uow.clone(),
            hasher,
            passwords,
            encoder,
        ));

        Self {
            ttl,
            jwt_decoder,
            user_service,
            reset_service,
            address_service: Arc::new(AddressService::new(uow.clone())),
            banner_service: Arc::new(BannerService::new(uow.clone())),
            message_service: Arc::new(MessageService::new(uow.clone())),
            notification_service: Arc::new(NotificationService::new(uow.clone())),
            report_service: Arc::new(ReportService::new(uow)),
            admin_service,
            upload_service: Arc::new(UploadService::new(config.upload.clone())),
            config: Arc::new(config),
        }
    }
}
