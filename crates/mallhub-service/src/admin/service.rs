//! Admin operations.
//!
//! Admins sign in separately from users and receive tokens with the admin
//! role. Only super admins may create further admins over the API; the CLI
//! bootstraps the first one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use mallhub_auth::jwt::{JwtEncoder, Role};
use mallhub_auth::password::{PasswordHasher, PasswordValidator};
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_database::store::Transaction;
use mallhub_entity::admin::{Admin, AdminField, AdminView, NewAdmin};

use super::ERR_ADMIN_NOT_EXIST;
use crate::context::RequestContext;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{Validated, validate};

/// Admin credentials.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminSigninRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter your username"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter a password"))]
    pub password: String,
}

impl Validated for AdminSigninRequest {
    const FIELDS: &'static [&'static str] = &["username", "password"];
}

/// A signed-in admin and their bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSigninView {
    pub admin: AdminView,
    pub token: String,
    pub expires_at: String,
}

/// Request to create an admin.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "username must be 1 to 32 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "please enter a name"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter a password"))]
    pub password: String,
    #[serde(default)]
    pub is_super: bool,
}

impl Validated for CreateAdminRequest {
    const FIELDS: &'static [&'static str] = &["username", "name", "password"];
}

/// Handles admins.
#[derive(Debug, Clone)]
pub struct AdminService {
    uow: UnitOfWork,
    hasher: Arc<PasswordHasher>,
    passwords: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

impl AdminService {
    pub fn new(
        uow: UnitOfWork,
        hasher: Arc<PasswordHasher>,
        passwords: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            uow,
            hasher,
            passwords,
            encoder,
        }
    }

    /// Verifies admin credentials and issues an admin token.
    pub async fn signin(&self, input: AdminSigninRequest) -> AppResult<AdminSigninView> {
        validate(&input)?;

        let username = input.username.clone();
        let admin: Option<Admin> = self
            .uow
            .run(move |tx| Box::pin(async move { tx.admins().find_by_username(&username).await }))
            .await?;

        let admin = admin.ok_or_else(|| AppError::invalid_params("invalid username or password"))?;
        if !self.hasher.verify_password(&input.password, &admin.password_hash)? {
            return Err(AppError::invalid_params("invalid username or password"));
        }

        let issued = self.encoder.issue(admin.id, Role::Admin)?;
        info!(admin_id = %admin.id, "Admin signed in");
        Ok(AdminSigninView {
            admin: AdminView::from(&admin),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// The calling admin's profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<AdminView> {
        let id = ctx.actor_id;
        let admin = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.admins()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_ADMIN_NOT_EXIST))
                })
            })
            .await?;
        Ok(AdminView::from(&admin))
    }

    /// Creates an admin on behalf of a super admin.
    pub async fn create_by(
        &self,
        ctx: &RequestContext,
        input: CreateAdminRequest,
    ) -> AppResult<AdminView> {
        if !ctx.is_admin() {
            return Err(AppError::unauthorized("permission denied"));
        }
        validate(&input)?;
        self.passwords.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let actor = ctx.actor_id;
        let admin = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let creator = tx
                        .admins()
                        .find_by_id(actor)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_ADMIN_NOT_EXIST))?;
                    if !creator.is_super {
                        return Err(AppError::unauthorized("only a super admin can create admins"));
                    }
                    insert_admin(tx, input, password_hash).await
                })
            })
            .await?;

        info!(admin_id = %admin.id, created_by = %actor, "Admin created");
        Ok(AdminView::from(&admin))
    }

    /// Creates an admin without an acting admin (command line bootstrap).
    pub async fn create(&self, input: CreateAdminRequest) -> AppResult<AdminView> {
        validate(&input)?;
        self.passwords.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let admin = self
            .uow
            .run(move |tx| Box::pin(async move { insert_admin(tx, input, password_hash).await }))
            .await?;

        info!(admin_id = %admin.id, username = %admin.username, "Admin created");
        Ok(AdminView::from(&admin))
    }

    /// Every admin.
    pub async fn list(&self, query: Query) -> AppResult<Paged<AdminView>> {
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.admins().list(query).await }))
            .await?;
        Ok(page.map(|a| AdminView::from(&a)))
    }

    /// Deletes every admin whose `field` equals `value`; returns the count.
    pub async fn delete_by_field(&self, field: AdminField, value: String) -> AppResult<u64> {
        if value.trim().is_empty() {
            return Err(AppError::invalid_params("please provide a value"));
        }

        let target = value.clone();
        let deleted = self
            .uow
            .run(move |tx| Box::pin(async move { tx.admins().delete_by_field(field, &target).await }))
            .await?;

        if deleted == 0 {
            return Err(AppError::not_found(ERR_ADMIN_NOT_EXIST));
        }
        info!(field = field.column(), value = %value, deleted, "Admins deleted");
        Ok(deleted)
    }
}

async fn insert_admin(
    tx: &mut (dyn Transaction + 'static),
    input: CreateAdminRequest,
    password_hash: String,
) -> AppResult<Admin> {
    if tx.admins().find_by_username(&input.username).await?.is_some() {
        return Err(AppError::conflict("admin already exists"));
    }
    tx.admins()
        .create(NewAdmin {
            username: input.username,
            name: input.name,
            password_hash,
            is_super: input.is_super,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_auth::JwtDecoder;
    use mallhub_core::config::AuthConfig;
    use mallhub_core::error::ErrorKind;
    use mallhub_database::MemoryDatabase;

    use crate::testing::{PASSWORD, seed_admin, uow};

    fn service(db: &MemoryDatabase) -> AdminService {
        let config = AuthConfig::default();
        AdminService::new(
            uow(db),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config)),
            Arc::new(JwtEncoder::new(&config)),
        )
    }

    fn request(username: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            username: username.into(),
            name: "Operator".into(),
            password: PASSWORD.into(),
            is_super: false,
        }
    }

    #[tokio::test]
    async fn test_signin_issues_admin_token() {
        let db = MemoryDatabase::new();
        let admin = seed_admin(&db, "root", true).await;
        let svc = service(&db);

        let signed = svc
            .signin(AdminSigninRequest {
                username: "root".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();

        let decoder = JwtDecoder::new(&AuthConfig::default());
        assert_eq!(decoder.decode_for(&signed.token, Role::Admin).unwrap().sub, admin.id);
        assert!(decoder.decode_for(&signed.token, Role::User).is_err());
    }

    #[tokio::test]
    async fn test_only_super_admin_creates_admins() {
        let db = MemoryDatabase::new();
        let root = seed_admin(&db, "root", true).await;
        let plain = seed_admin(&db, "plain", false).await;
        let svc = service(&db);

        let err = svc
            .create_by(&RequestContext::admin(plain.id), request("ops"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let err = svc
            .create_by(&RequestContext::user(root.id), request("ops"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let created = svc
            .create_by(&RequestContext::admin(root.id), request("ops"))
            .await
            .unwrap();
        assert_eq!(created.username, "ops");

        let err = svc
            .create_by(&RequestContext::admin(root.id), request("ops"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "admin already exists");
    }

    #[tokio::test]
    async fn test_delete_by_username() {
        let db = MemoryDatabase::new();
        seed_admin(&db, "root", true).await;
        let svc = service(&db);
        svc.create(request("ops")).await.unwrap();

        assert_eq!(svc.delete_by_field(AdminField::Username, "ops".into()).await.unwrap(), 1);
        let err = svc
            .delete_by_field(AdminField::Username, "ops".into())
            .await
            .unwrap_err();
        assert_eq!(err.message, ERR_ADMIN_NOT_EXIST);
        assert_eq!(svc.list(Query::default()).await.unwrap().total, 1);
    }
}
