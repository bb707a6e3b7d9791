//! User self-service operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use mallhub_auth::code as reset_code;
use mallhub_auth::jwt::{JwtEncoder, Role};
use mallhub_auth::password::{PasswordHasher, PasswordValidator};
use mallhub_cache::keys;
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;
use mallhub_entity::user::{NewUser, User, UserView};

use super::ERR_USER_NOT_EXIST;
use crate::context::RequestContext;
use crate::reset::RESET_CODE_TTL;
use crate::reset::service::parse_sms_entry;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{Validated, validate};

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "username must be 1 to 32 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter a password"))]
    pub password: String,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32, message = "invalid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 32, message = "nickname must be at most 32 characters"))]
    pub nickname: Option<String>,
}

impl Validated for SignupRequest {
    const FIELDS: &'static [&'static str] = &["username", "password", "email", "phone", "nickname"];
}

/// Request to sign in with a username, email, or phone number.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter your account"))]
    pub account: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter a password"))]
    pub password: String,
}

impl Validated for SigninRequest {
    const FIELDS: &'static [&'static str] = &["account", "password"];
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigninView {
    pub user: UserView,
    pub token: String,
    pub expires_at: String,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the old password"))]
    pub old_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the new password"))]
    pub new_password: String,
}

impl Validated for ChangePasswordRequest {
    const FIELDS: &'static [&'static str] = &["old_password", "new_password"];
}

/// Request to choose a new password with a reset code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the reset code"))]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the new password"))]
    pub new_password: String,
    /// Phone the code was texted to; absent for emailed codes.
    #[validate(length(min = 1, message = "please enter a phone number"))]
    pub phone: Option<String>,
}

impl Validated for ResetPasswordRequest {
    const FIELDS: &'static [&'static str] = &["code", "new_password", "phone"];
}

/// Redemption attempts allowed per phone within one code lifetime.
pub const MAX_SMS_ATTEMPTS: i64 = 5;

const ERR_INVALID_CODE: &str = "invalid reset code";
const ERR_TOO_MANY_ATTEMPTS: &str = "too many attempts, request a new code";

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    uow: UnitOfWork,
    ttl: Arc<dyn TtlStore>,
    hasher: Arc<PasswordHasher>,
    passwords: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        uow: UnitOfWork,
        ttl: Arc<dyn TtlStore>,
        hasher: Arc<PasswordHasher>,
        passwords: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            uow,
            ttl,
            hasher,
            passwords,
            encoder,
        }
    }

    /// Creates an account. Username, email, and phone must all be unused.
    pub async fn signup(&self, input: SignupRequest) -> AppResult<UserView> {
        validate(&input)?;
        self.passwords.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    if tx.users().find_by_username(&input.username).await?.is_some() {
                        return Err(AppError::conflict("username already exists"));
                    }
                    if let Some(email) = &input.email
                        && tx.users().find_by_email(email).await?.is_some()
                    {
                        return Err(AppError::conflict("email already in use"));
                    }
                    if let Some(phone) = &input.phone
                        && tx.users().find_by_phone(phone).await?.is_some()
                    {
                        return Err(AppError::conflict("phone already in use"));
                    }

                    tx.users()
                        .create(NewUser {
                            username: input.username,
                            email: input.email,
                            phone: input.phone,
                            nickname: input.nickname,
                            password_hash,
                        })
                        .await
                })
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(UserView::from(&user))
    }

    /// Verifies credentials and issues a user token.
    pub async fn signin(&self, input: SigninRequest) -> AppResult<SigninView> {
        validate(&input)?;

        let account = input.account.clone();
        let user: Option<User> = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    if let Some(user) = tx.users().find_by_username(&account).await? {
                        return Ok(Some(user));
                    }
                    if let Some(user) = tx.users().find_by_email(&account).await? {
                        return Ok(Some(user));
                    }
                    tx.users().find_by_phone(&account).await
                })
            })
            .await?;

        let user = user.ok_or_else(|| AppError::invalid_params("invalid account or password"))?;
        if !self.hasher.verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::invalid_params("invalid account or password"));
        }
        if !user.status.can_sign_in() {
            return Err(AppError::unauthorized("account is banned"));
        }

        let issued = self.encoder.issue(user.id, Role::User)?;
        info!(user_id = %user.id, "User signed in");
        Ok(SigninView {
            user: UserView::from(&user),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// The caller's own profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<UserView> {
        let uid = ctx.actor_id;
        let user = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.users()
                        .find_by_id(uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_USER_NOT_EXIST))
                })
            })
            .await?;
        Ok(UserView::from(&user))
    }

    /// Replaces the caller's password after checking the old one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        input: ChangePasswordRequest,
    ) -> AppResult<bool> {
        validate(&input)?;
        self.passwords.validate(&input.new_password)?;
        self.passwords
            .validate_not_same(&input.old_password, &input.new_password)?;
        let new_hash = self.hasher.hash_password(&input.new_password)?;

        let uid = ctx.actor_id;
        let hasher = Arc::clone(&self.hasher);
        self.uow
            .run(move |tx| {
                Box::pin(async move {
                    let user = tx
                        .users()
                        .find_by_id(uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_USER_NOT_EXIST))?;
                    if !hasher.verify_password(&input.old_password, &user.password_hash)? {
                        return Err(AppError::invalid_params("invalid old password"));
                    }
                    tx.users().update_password(uid, &new_hash).await?;
                    Ok(())
                })
            })
            .await?;

        info!(user_id = %uid, "Password changed");
        Ok(true)
    }

    /// Consumes a reset code and sets a new password for its owner.
    ///
    /// Emailed codes are redeemed by code alone; texted codes only together
    /// with their phone, and each phone gets [`MAX_SMS_ATTEMPTS`] tries per
    /// code lifetime.
    pub async fn reset_password(&self, input: ResetPasswordRequest) -> AppResult<bool> {
        validate(&input)?;
        self.passwords.validate(&input.new_password)?;

        let (uid, used_keys) = match input.phone.as_deref() {
            Some(phone) => (
                self.redeem_sms_code(phone, &input.code).await?,
                vec![keys::sms_reset_code(phone), keys::sms_reset_attempts(phone)],
            ),
            None => (
                self.redeem_email_code(&input.code).await?,
                vec![keys::reset_code(&input.code)],
            ),
        };
        let new_hash = self.hasher.hash_password(&input.new_password)?;

        self.uow
            .run(move |tx| {
                Box::pin(async move {
                    if !tx.users().update_password(uid, &new_hash).await? {
                        return Err(AppError::not_found(ERR_USER_NOT_EXIST));
                    }
                    Ok(())
                })
            })
            .await?;

        for key in used_keys {
            if let Err(e) = self.ttl.delete(&key).await {
                warn!(user_id = %uid, error = %e, "Failed to remove used reset code");
            }
        }
        info!(user_id = %uid, "Password reset with code");
        Ok(true)
    }

    async fn redeem_email_code(&self, code: &str) -> AppResult<Uuid> {
        if !reset_code::is_reset_code(code) {
            return Err(AppError::invalid_params(ERR_INVALID_CODE));
        }
        self.ttl
            .get(&keys::reset_code(code))
            .await?
            .and_then(|raw| Uuid::parse_str(&raw).ok())
            .ok_or_else(|| AppError::invalid_params(ERR_INVALID_CODE))
    }

    async fn redeem_sms_code(&self, phone: &str, code: &str) -> AppResult<Uuid> {
        let key = keys::sms_reset_code(phone);
        let attempts = self
            .ttl
            .incr(&keys::sms_reset_attempts(phone), RESET_CODE_TTL)
            .await?;
        if attempts > MAX_SMS_ATTEMPTS {
            if let Err(e) = self.ttl.delete(&key).await {
                warn!(error = %e, "Failed to remove locked reset code");
            }
            warn!(attempts, "Reset code attempts exhausted");
            return Err(AppError::invalid_params(ERR_TOO_MANY_ATTEMPTS));
        }

        let entry = self.ttl.get(&key).await?;
        entry
            .as_deref()
            .and_then(parse_sms_entry)
            .filter(|(_, stored)| *stored == code)
            .map(|(uid, _)| uid)
            .ok_or_else(|| AppError::invalid_params(ERR_INVALID_CODE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_auth::JwtDecoder;
    use mallhub_cache::memory::MemoryTtlStore;
    use mallhub_core::config::AuthConfig;
    use mallhub_core::error::ErrorKind;
    use mallhub_database::MemoryDatabase;

    use crate::testing::{PASSWORD, seed_user, uow};

    fn service(db: &MemoryDatabase, ttl: Arc<dyn TtlStore>) -> UserService {
        let config = AuthConfig::default();
        UserService::new(
            uow(db),
            ttl,
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config)),
            Arc::new(JwtEncoder::new(&config)),
        )
    }

    fn signup_request(username: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            password: PASSWORD.into(),
            email: Some(format!("{username}@example.com")),
            phone: None,
            nickname: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_signin_by_email() {
        let db = MemoryDatabase::new();
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));

        let user = svc.signup(signup_request("alice")).await.unwrap();
        assert_eq!(user.created_at, user.updated_at);

        let signed = svc
            .signin(SigninRequest {
                account: "alice@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
        assert_eq!(signed.user.id, user.id);

        let claims = JwtDecoder::new(&AuthConfig::default())
            .decode_for(&signed.token, Role::User)
            .unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_conflicts() {
        let db = MemoryDatabase::new();
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));
        svc.signup(signup_request("bob")).await.unwrap();

        let mut again = signup_request("bob");
        again.email = None;
        let err = svc.signup(again).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "username already exists");
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let db = MemoryDatabase::new();
        seed_user(&db, "carol", "carol@example.com", "13700000000").await;
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));

        let err = svc
            .signin(SigninRequest {
                account: "carol".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "invalid account or password");
    }

    #[tokio::test]
    async fn test_change_password_checks_old() {
        let db = MemoryDatabase::new();
        let user = seed_user(&db, "dave", "dave@example.com", "13600000000").await;
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));
        let ctx = RequestContext::user(user.id);

        let err = svc
            .change_password(
                &ctx,
                ChangePasswordRequest {
                    old_password: "wrong-one".into(),
                    new_password: "brand-new".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message, "invalid old password");

        assert!(
            svc.change_password(
                &ctx,
                ChangePasswordRequest {
                    old_password: PASSWORD.into(),
                    new_password: "brand-new".into(),
                },
            )
            .await
            .unwrap()
        );
    }

    async fn store_sms_code(ttl: &Arc<dyn TtlStore>, phone: &str, uid: Uuid, code: &str) {
        ttl.set(
            &keys::sms_reset_code(phone),
            &crate::reset::service::sms_entry(uid, code),
            RESET_CODE_TTL,
        )
        .await
        .unwrap();
    }

    fn sms_reset(phone: Option<&str>, code: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            code: code.into(),
            new_password: "attacker1".into(),
            phone: phone.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_reset_password_consumes_code() {
        let db = MemoryDatabase::new();
        let user = seed_user(&db, "erin", "erin@example.com", "13500000000").await;
        let ttl: Arc<dyn TtlStore> = Arc::new(MemoryTtlStore::default());
        let code = reset_code::reset_code(user.id);
        ttl.set(&keys::reset_code(&code), &user.id.to_string(), RESET_CODE_TTL)
            .await
            .unwrap();
        let svc = service(&db, Arc::clone(&ttl));

        let request = ResetPasswordRequest {
            code: code.clone(),
            new_password: "fresh-pass".into(),
            phone: None,
        };
        assert!(svc.reset_password(request.clone()).await.unwrap());
        assert!(!ttl.exists(&keys::reset_code(&code)).await.unwrap());

        let err = svc.reset_password(request).await.unwrap_err();
        assert_eq!(err.message, ERR_INVALID_CODE);

        let stored = db.snapshot().await.users[0].password_hash.clone();
        assert!(PasswordHasher::new().verify_password("fresh-pass", &stored).unwrap());
    }

    #[tokio::test]
    async fn test_sms_code_redeemed_with_its_phone() {
        let db = MemoryDatabase::new();
        let user = seed_user(&db, "gail", "gail@example.com", "13300000000").await;
        let ttl: Arc<dyn TtlStore> = Arc::new(MemoryTtlStore::default());
        store_sms_code(&ttl, "13300000000", user.id, "042137").await;
        let svc = service(&db, Arc::clone(&ttl));

        assert!(svc.reset_password(sms_reset(Some("13300000000"), "042137")).await.unwrap());
        assert!(!ttl.exists(&keys::sms_reset_code("13300000000")).await.unwrap());
        assert!(!ttl.exists(&keys::sms_reset_attempts("13300000000")).await.unwrap());
    }

    #[tokio::test]
    async fn test_sms_code_without_phone_never_matches() {
        let db = MemoryDatabase::new();
        let user = seed_user(&db, "hank", "hank@example.com", "13200000000").await;
        let ttl: Arc<dyn TtlStore> = Arc::new(MemoryTtlStore::default());
        store_sms_code(&ttl, "13200000000", user.id, "042137").await;
        let svc = service(&db, Arc::clone(&ttl));

        let err = svc.reset_password(sms_reset(None, "042137")).await.unwrap_err();
        assert_eq!(err.message, ERR_INVALID_CODE);

        let err = svc
            .reset_password(sms_reset(Some("13900000000"), "042137"))
            .await
            .unwrap_err();
        assert_eq!(err.message, ERR_INVALID_CODE);
        assert!(ttl.exists(&keys::sms_reset_code("13200000000")).await.unwrap());
    }

    #[tokio::test]
    async fn test_sms_code_guessing_is_capped() {
        let db = MemoryDatabase::new();
        let user = seed_user(&db, "ivan", "ivan@example.com", "13100000000").await;
        let ttl: Arc<dyn TtlStore> = Arc::new(MemoryTtlStore::default());
        store_sms_code(&ttl, "13100000000", user.id, "726410").await;
        let svc = service(&db, Arc::clone(&ttl));

        let mut hit = None;
        let mut locked = 0;
        for n in 0..1000 {
            let guess = format!("{:06}", 726_000 + n);
            match svc.reset_password(sms_reset(Some("13100000000"), &guess)).await {
                Ok(_) => hit = Some(guess),
                Err(e) if e.message == ERR_TOO_MANY_ATTEMPTS => locked += 1,
                Err(e) => assert_eq!(e.message, ERR_INVALID_CODE),
            }
        }
        assert_eq!(hit, None);
        assert_eq!(locked, 1000 - MAX_SMS_ATTEMPTS);
        assert!(!ttl.exists(&keys::sms_reset_code("13100000000")).await.unwrap());

        let stored = db.snapshot().await.users[0].password_hash.clone();
        assert!(PasswordHasher::new().verify_password(PASSWORD, &stored).unwrap());
    }

    #[tokio::test]
    async fn test_malformed_email_code_is_rejected() {
        let db = MemoryDatabase::new();
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));

        let err = svc.reset_password(sms_reset(None, "sms:13100000000")).await.unwrap_err();
        assert_eq!(err.message, ERR_INVALID_CODE);
    }

    #[tokio::test]
    async fn test_signin_validation_opens_no_transaction() {
        let db = MemoryDatabase::new();
        let svc = service(&db, Arc::new(MemoryTtlStore::default()));

        let err = svc
            .signin(SigninRequest {
                account: String::new(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "please enter your account");
        assert_eq!(db.begin_count(), 0);
    }
}
