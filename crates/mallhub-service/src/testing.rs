//! Fixtures shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use mallhub_auth::password::PasswordHasher;
use mallhub_core::config::{TelephoneConfig, UnitOfWorkConfig};
use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_database::MemoryDatabase;
use mallhub_entity::admin::Admin;
use mallhub_entity::user::{User, UserStatus};

use crate::provider::telephone::SmsTemplates;
use crate::provider::{Mailer, Telephone};
use crate::unit_of_work::UnitOfWork;

pub const PASSWORD: &str = "secret123";

pub fn uow(db: &MemoryDatabase) -> UnitOfWork {
    UnitOfWork::new(Arc::new(db.clone()), &UnitOfWorkConfig::default())
}

pub async fn seed_user(db: &MemoryDatabase, username: &str, email: &str, phone: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        nickname: None,
        password_hash: PasswordHasher::new().hash_password(PASSWORD).unwrap(),
        status: UserStatus::Active,
        created_at: now,
        updated_at: now,
    };
    let row = user.clone();
    db.seed(move |t| t.users.push(row)).await;
    user
}

pub async fn seed_admin(db: &MemoryDatabase, username: &str, is_super: bool) -> Admin {
    let now = Utc::now();
    let admin = Admin {
        id: Uuid::new_v4(),
        username: username.to_string(),
        name: username.to_string(),
        password_hash: PasswordHasher::new().hash_password(PASSWORD).unwrap(),
        is_super,
        created_at: now,
        updated_at: now,
    };
    let row = admin.clone();
    db.seed(move |t| t.admins.push(row)).await;
    admin
}

/// How a fake provider behaves after recording a send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    #[default]
    Succeed,
    Fail,
    Panic,
    /// Sleep, then fail.
    StallThenFail(Duration),
}

impl Delivery {
    async fn finish(self, failure: &str) -> AppResult<()> {
        match self {
            Delivery::Succeed => Ok(()),
            Delivery::Fail => Err(AppError::external(failure)),
            Delivery::Panic => panic!("provider sdk blew up"),
            Delivery::StallThenFail(delay) => {
                tokio::time::sleep(delay).await;
                Err(AppError::external(failure))
            }
        }
    }
}

/// Mailer that records what it was asked to send, then behaves as its
/// [`Delivery`] says.
#[derive(Debug, Default)]
pub struct FakeMailer {
    pub delivery: Delivery,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl FakeMailer {
    pub fn with(delivery: Delivery) -> Self {
        Self {
            delivery,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::with(Delivery::Fail)
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, _subject: &str, body: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        self.delivery.finish("failed to send email").await
    }
}

/// SMS sender that records codes; see [`FakeMailer`].
#[derive(Debug)]
pub struct FakeTelephone {
    pub delivery: Delivery,
    pub templates: SmsTemplates,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl FakeTelephone {
    pub fn new(fail: bool) -> Self {
        Self::with(if fail { Delivery::Fail } else { Delivery::Succeed })
    }

    pub fn with(delivery: Delivery) -> Self {
        Self {
            delivery,
            templates: SmsTemplates::new(&TelephoneConfig::default()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Telephone for FakeTelephone {
    fn templates(&self) -> &SmsTemplates {
        &self.templates
    }

    async fn send(
        &self,
        phone: &str,
        _template_id: &str,
        params: &HashMap<String, String>,
    ) -> AppResult<()> {
        let code = params.get("code").cloned().unwrap_or_default();
        self.sent.lock().unwrap().push((phone.to_string(), code));
        self.delivery.finish("failed to send sms").await
    }
}
