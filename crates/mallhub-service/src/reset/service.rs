//! Reset-code issuance.
//!
//! The account lookup runs in a unit of work; the code is stored and
//! delivered after it returns, so the transaction timeout never cuts a
//! delivery short. A code is stored before delivery is attempted and is
//! deleted again when delivery fails, panics, times out, or is cancelled.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use mallhub_auth::code;
use mallhub_cache::keys;
use mallhub_core::config::{EmailConfig, TelephoneConfig};
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::traits::TtlStore;
use mallhub_database::panic_message;

use crate::provider::{Mailer, Telephone};
use crate::unit_of_work::UnitOfWork;
use crate::user::ERR_USER_NOT_EXIST;
use crate::validation::{Validated, validate};

/// Lifetime of a reset code.
pub const RESET_CODE_TTL: Duration = Duration::from_secs(30 * 60);

/// Request to email a reset link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendResetEmailRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "please enter an email address"),
        email(message = "invalid email address")
    )]
    pub to: String,
}

impl Validated for SendResetEmailRequest {
    const FIELDS: &'static [&'static str] = &["to"];
}

/// Request to text a reset code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendResetSmsRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter a phone number"))]
    pub phone: String,
}

impl Validated for SendResetSmsRequest {
    const FIELDS: &'static [&'static str] = &["phone"];
}

/// TTL store value of an SMS code: `"{owner_id}:{code}"`.
pub(crate) fn sms_entry(uid: Uuid, code: &str) -> String {
    format!("{uid}:{code}")
}

/// Split an SMS code entry back into owner and code.
pub(crate) fn parse_sms_entry(raw: &str) -> Option<(Uuid, &str)> {
    let (uid, code) = raw.split_once(':')?;
    Some((Uuid::parse_str(uid).ok()?, code))
}

/// Issues reset codes and hands them to a delivery provider.
#[derive(Debug, Clone)]
pub struct ResetService {
    uow: UnitOfWork,
    ttl: Arc<dyn TtlStore>,
    mailer: Arc<dyn Mailer>,
    telephone: Arc<dyn Telephone>,
    reset_url: String,
    email_timeout: Duration,
    sms_timeout: Duration,
}

impl ResetService {
    pub fn new(
        uow: UnitOfWork,
        ttl: Arc<dyn TtlStore>,
        mailer: Arc<dyn Mailer>,
        telephone: Arc<dyn Telephone>,
        email: &EmailConfig,
        sms: &TelephoneConfig,
    ) -> Self {
        Self {
            uow,
            ttl,
            mailer,
            telephone,
            reset_url: email.reset_password_url.clone(),
            email_timeout: Duration::from_secs(email.timeout_seconds),
            sms_timeout: Duration::from_secs(sms.timeout_seconds),
        }
    }

    /// Emails a reset link to the account registered under `to`.
    pub async fn send_reset_email(&self, input: SendResetEmailRequest) -> AppResult<bool> {
        validate(&input)?;

        let to = input.to.clone();
        let uid = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let user = tx
                        .users()
                        .find_by_email(&input.to)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_USER_NOT_EXIST))?;
                    Ok(user.id)
                })
            })
            .await?;

        let code = code::reset_code(uid);
        let key = keys::reset_code(&code);
        if !self.ttl.set_nx(&key, &uid.to_string(), RESET_CODE_TTL).await? {
            return Err(AppError::conflict("reset code collision, please retry"));
        }

        let link = format!("{}{code}", self.reset_url);
        deliver_or_revoke(
            &self.ttl,
            key,
            uid,
            self.email_timeout,
            self.mailer.send_forgot_password(&to, &link),
        )
        .await?;

        info!(user_id = %uid, "Reset email sent");
        Ok(true)
    }

    /// Texts a reset code to the account registered under `phone`. A new
    /// code replaces the phone's previous one.
    pub async fn send_reset_sms(&self, input: SendResetSmsRequest) -> AppResult<bool> {
        validate(&input)?;

        let phone = input.phone.clone();
        let uid = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let user = tx
                        .users()
                        .find_by_phone(&input.phone)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_USER_NOT_EXIST))?;
                    Ok(user.id)
                })
            })
            .await?;

        let code = code::sms_code();
        let key = keys::sms_reset_code(&phone);
        self.ttl
            .set(&key, &sms_entry(uid, &code), RESET_CODE_TTL)
            .await?;

        deliver_or_revoke(
            &self.ttl,
            key,
            uid,
            self.sms_timeout,
            self.telephone.send_reset_password_code(&phone, &code),
        )
        .await?;

        info!(user_id = %uid, "Reset SMS sent");
        Ok(true)
    }
}

/// Run `deliver` for the code stored under `key`. Unless delivery succeeds
/// the key is deleted again; a panicking provider counts as a failed
/// delivery and surfaces as `ExternalService`.
async fn deliver_or_revoke<F>(
    ttl: &Arc<dyn TtlStore>,
    key: String,
    uid: Uuid,
    timeout: Duration,
    deliver: F,
) -> AppResult<()>
where
    F: Future<Output = AppResult<()>> + Send,
{
    let pending = PendingCode::new(Arc::clone(ttl), key, uid);

    let delivered =
        match tokio::time::timeout(timeout, AssertUnwindSafe(deliver).catch_unwind()).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(AppError::external(format!(
                "delivery provider panicked: {}",
                panic_message(panic.as_ref())
            ))),
            Err(_) => Err(AppError::timeout(format!(
                "delivery timed out after {}s",
                timeout.as_secs()
            ))),
        };

    match delivered {
        Ok(()) => {
            pending.keep();
            Ok(())
        }
        Err(err) => {
            pending.revoke().await;
            Err(err)
        }
    }
}

/// A stored code whose delivery has not been confirmed. Dropping it
/// without calling [`PendingCode::keep`] deletes the code in the background.
struct PendingCode {
    ttl: Option<Arc<dyn TtlStore>>,
    key: String,
    uid: Uuid,
}

impl PendingCode {
    fn new(ttl: Arc<dyn TtlStore>, key: String, uid: Uuid) -> Self {
        Self {
            ttl: Some(ttl),
            key,
            uid,
        }
    }

    fn keep(mut self) {
        self.ttl = None;
    }

    async fn revoke(mut self) {
        if let Some(ttl) = self.ttl.take() {
            remove_code(ttl.as_ref(), &self.key, self.uid).await;
        }
    }
}

impl Drop for PendingCode {
    fn drop(&mut self) {
        let Some(ttl) = self.ttl.take() else {
            return;
        };
        let key = std::mem::take(&mut self.key);
        let uid = self.uid;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { remove_code(ttl.as_ref(), &key, uid).await });
            }
            Err(_) => warn!(user_id = %uid, "No runtime to remove cancelled reset code"),
        }
    }
}

async fn remove_code(ttl: &dyn TtlStore, key: &str, uid: Uuid) {
    if let Err(err) = ttl.delete(key).await {
        warn!(user_id = %uid, error = %err, "Failed to remove undelivered reset code");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_cache::memory::MemoryTtlStore;
    use mallhub_core::config::UnitOfWorkConfig;
    use mallhub_core::error::ErrorKind;
    use mallhub_database::MemoryDatabase;

    use crate::testing::{Delivery, FakeMailer, FakeTelephone, seed_user, uow};

    const PHONE: &str = "13400000000";

    struct Fixture {
        db: MemoryDatabase,
        ttl: Arc<MemoryTtlStore>,
        mailer: Arc<FakeMailer>,
        telephone: Arc<FakeTelephone>,
        svc: ResetService,
    }

    async fn fixture(mailer: FakeMailer, telephone: FakeTelephone) -> Fixture {
        fixture_with(mailer, telephone, uow).await
    }

    async fn fixture_with(
        mailer: FakeMailer,
        telephone: FakeTelephone,
        make_uow: impl FnOnce(&MemoryDatabase) -> UnitOfWork,
    ) -> Fixture {
        let db = MemoryDatabase::new();
        seed_user(&db, "frank", "frank@example.com", PHONE).await;
        let ttl = Arc::new(MemoryTtlStore::default());
        let mailer = Arc::new(mailer);
        let telephone = Arc::new(telephone);
        let svc = ResetService::new(
            make_uow(&db),
            ttl.clone(),
            mailer.clone(),
            telephone.clone(),
            &EmailConfig::default(),
            &TelephoneConfig::default(),
        );
        Fixture {
            db,
            ttl,
            mailer,
            telephone,
            svc,
        }
    }

    fn email_request() -> SendResetEmailRequest {
        SendResetEmailRequest {
            to: "frank@example.com".into(),
        }
    }

    fn code_in(body: &str) -> String {
        let prefix = EmailConfig::default().reset_password_url;
        body.lines()
            .find_map(|l| l.strip_prefix(prefix.as_str()))
            .unwrap()
            .to_string()
    }

    fn last_email_key(f: &Fixture) -> String {
        let (_, body) = f.mailer.sent.lock().unwrap()[0].clone();
        keys::reset_code(&code_in(&body))
    }

    #[tokio::test]
    async fn test_email_code_is_stored_and_linked() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(false)).await;

        assert!(f.svc.send_reset_email(email_request()).await.unwrap());

        let (to, body) = f.mailer.sent.lock().unwrap()[0].clone();
        assert_eq!(to, "frank@example.com");
        let code = code_in(&body);
        assert_eq!(code.len(), 32);

        let uid = f.ttl.get(&keys::reset_code(&code)).await.unwrap().unwrap();
        assert_eq!(uid, f.db.snapshot().await.users[0].id.to_string());
    }

    #[tokio::test]
    async fn test_failed_email_leaves_no_code() {
        let f = fixture(FakeMailer::failing(), FakeTelephone::new(false)).await;

        let err = f.svc.send_reset_email(email_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(!f.ttl.exists(&last_email_key(&f)).await.unwrap());
    }

    #[tokio::test]
    async fn test_panicking_mailer_leaves_no_code() {
        let f = fixture(FakeMailer::with(Delivery::Panic), FakeTelephone::new(false)).await;

        let err = f.svc.send_reset_email(email_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(err.message.contains("provider sdk blew up"));
        assert!(!f.ttl.exists(&last_email_key(&f)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_outlasting_transaction_timeout_still_cleans_up() {
        let short_uow = |db: &MemoryDatabase| {
            UnitOfWork::new(
                Arc::new(db.clone()),
                &UnitOfWorkConfig { timeout_seconds: 1 },
            )
        };
        let f = fixture_with(
            FakeMailer::with(Delivery::StallThenFail(Duration::from_secs(5))),
            FakeTelephone::new(false),
            short_uow,
        )
        .await;

        let err = f.svc.send_reset_email(email_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(!f.ttl.exists(&last_email_key(&f)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_delivery_times_out_and_cleans_up() {
        let f = fixture(
            FakeMailer::with(Delivery::StallThenFail(Duration::from_secs(60))),
            FakeTelephone::new(false),
        )
        .await;

        let err = f.svc.send_reset_email(email_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert!(!f.ttl.exists(&last_email_key(&f)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_issuance_leaves_no_code() {
        let f = fixture(
            FakeMailer::with(Delivery::StallThenFail(Duration::from_secs(5))),
            FakeTelephone::new(false),
        )
        .await;

        let cancelled =
            tokio::time::timeout(Duration::from_secs(1), f.svc.send_reset_email(email_request()))
                .await;
        assert!(cancelled.is_err());

        // The drop guard removes the code on a spawned task.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!f.ttl.exists(&last_email_key(&f)).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_sms_leaves_no_code() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(true)).await;

        let err = f
            .svc
            .send_reset_sms(SendResetSmsRequest {
                phone: PHONE.into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(!f.ttl.exists(&keys::sms_reset_code(PHONE)).await.unwrap());
    }

    #[tokio::test]
    async fn test_panicking_telephone_leaves_no_code() {
        let f = fixture(FakeMailer::default(), FakeTelephone::with(Delivery::Panic)).await;

        let err = f
            .svc
            .send_reset_sms(SendResetSmsRequest {
                phone: PHONE.into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(!f.ttl.exists(&keys::sms_reset_code(PHONE)).await.unwrap());
    }

    #[tokio::test]
    async fn test_sms_code_is_scoped_to_phone() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(false)).await;

        f.svc
            .send_reset_sms(SendResetSmsRequest {
                phone: PHONE.into(),
            })
            .await
            .unwrap();

        let (phone, code) = f.telephone.sent.lock().unwrap()[0].clone();
        assert_eq!(phone, PHONE);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(!f.ttl.exists(&keys::reset_code(&code)).await.unwrap());

        let raw = f.ttl.get(&keys::sms_reset_code(PHONE)).await.unwrap().unwrap();
        let (uid, stored) = parse_sms_entry(&raw).unwrap();
        assert_eq!(uid, f.db.snapshot().await.users[0].id);
        assert_eq!(stored, code);
    }

    #[tokio::test]
    async fn test_sms_resend_replaces_previous_code() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(false)).await;
        let request = SendResetSmsRequest {
            phone: PHONE.into(),
        };

        f.svc.send_reset_sms(request.clone()).await.unwrap();
        f.svc.send_reset_sms(request).await.unwrap();

        let latest = f.telephone.sent.lock().unwrap()[1].1.clone();
        let raw = f.ttl.get(&keys::sms_reset_code(PHONE)).await.unwrap().unwrap();
        assert_eq!(parse_sms_entry(&raw).unwrap().1, latest);
    }

    #[tokio::test]
    async fn test_unknown_account_issues_nothing() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(false)).await;

        let err = f
            .svc
            .send_reset_email(SendResetEmailRequest {
                to: "nobody@example.com".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, ERR_USER_NOT_EXIST);
        assert!(f.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_opens_no_transaction() {
        let f = fixture(FakeMailer::default(), FakeTelephone::new(false)).await;

        let err = f
            .svc
            .send_reset_email(SendResetEmailRequest { to: "not-an-email".into() })
            .await
            .unwrap_err();
        assert_eq!(err.message, "invalid email address");
        assert_eq!(f.db.begin_count(), 0);
    }

    #[test]
    fn test_sms_entry_parsing() {
        let uid = Uuid::new_v4();
        assert_eq!(parse_sms_entry(&sms_entry(uid, "042137")), Some((uid, "042137")));
        assert_eq!(parse_sms_entry("not-a-uuid:042137"), None);
        assert_eq!(parse_sms_entry("no-separator"), None);
    }
}
