//! In-memory [`Database`] used by tests and the `memory` development mode.
//!
//! A transaction takes the table lock for its whole lifetime and works on a
//! private copy of the tables, so transactions are fully serialized. Commit
//! writes the copy back; rollback (or drop) discards it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::address::{Address, NewAddress};
use mallhub_entity::admin::{Admin, AdminField, NewAdmin};
use mallhub_entity::banner::{Banner, BannerPlatform, NewBanner};
use mallhub_entity::message::{Message, NewMessage};
use mallhub_entity::notification::{NewNotification, Notification, NotificationMark};
use mallhub_entity::report::{NewReport, Report, ReportStatus};
use mallhub_entity::user::{NewUser, User, UserStatus};

use crate::store::{
    AddressStore, AdminStore, BannerStore, Database, MessageStore, NotificationStore, ReportStore,
    Transaction, UserStore,
};

/// Every table of the schema.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub admins: Vec<Admin>,
    pub addresses: Vec<Address>,
    pub banners: Vec<Banner>,
    pub messages: Vec<Message>,
    pub notifications: Vec<Notification>,
    pub notification_marks: Vec<NotificationMark>,
    pub reports: Vec<Report>,
}

/// Shared in-memory database.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
    begins: Arc<AtomicUsize>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions opened so far.
    pub fn begin_count(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }

    /// Replace a table row directly, bypassing transactions (test fixtures).
    pub async fn seed<F: FnOnce(&mut Tables)>(&self, f: F) {
        f(&mut *self.tables.lock().await);
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> AppResult<Box<dyn Transaction>> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, work }))
    }
}

/// Transaction over [`MemoryDatabase`].
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    fn users(&mut self) -> &mut dyn UserStore {
        self
    }

    fn admins(&mut self) -> &mut dyn AdminStore {
        self
    }

    fn addresses(&mut self) -> &mut dyn AddressStore {
        self
    }

    fn banners(&mut self) -> &mut dyn BannerStore {
        self
    }

    fn messages(&mut self) -> &mut dyn MessageStore {
        self
    }

    fn notifications(&mut self) -> &mut dyn NotificationStore {
        self
    }

    fn reports(&mut self) -> &mut dyn ReportStore {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

/// Newest first, then slice out the requested page.
fn page_of<T: Clone>(
    mut rows: Vec<T>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
    query: Query,
) -> Paged<T> {
    rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
        .take(query.limit.max(0) as usize)
        .collect();
    Paged::new(items, total, query)
}

#[async_trait]
impl UserStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.work.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .work
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .work
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_phone(&mut self, phone: &str) -> AppResult<Option<User>> {
        Ok(self
            .work
            .users
            .iter()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn create(&mut self, data: NewUser) -> AppResult<User> {
        let taken = self.work.users.iter().any(|u| {
            u.username == data.username
                || (data.email.is_some() && u.email == data.email)
                || (data.phone.is_some() && u.phone == data.phone)
        });
        if taken {
            return Err(AppError::conflict("user already exists"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            phone: data.phone,
            nickname: data.nickname,
            password_hash: data.password_hash,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.work.users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&mut self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        match self.work.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AdminStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Admin>> {
        Ok(self.work.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<Admin>> {
        Ok(self
            .work
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create(&mut self, data: NewAdmin) -> AppResult<Admin> {
        if self.work.admins.iter().any(|a| a.username == data.username) {
            return Err(AppError::conflict("admin already exists"));
        }
        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4(),
            username: data.username,
            name: data.name,
            password_hash: data.password_hash,
            is_super: data.is_super,
            created_at: now,
            updated_at: now,
        };
        self.work.admins.push(admin.clone());
        Ok(admin)
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Admin>> {
        Ok(page_of(self.work.admins.clone(), |a| a.created_at, query))
    }

    async fn delete_by_field(&mut self, field: AdminField, value: &str) -> AppResult<u64> {
        let before = self.work.admins.len();
        self.work.admins.retain(|a| !field.matches(a, value));
        Ok((before - self.work.admins.len()) as u64)
    }
}

#[async_trait]
impl AddressStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Address>> {
        Ok(self
            .work
            .addresses
            .iter()
            .find(|a| a.id == id && a.uid == uid)
            .cloned())
    }

    async fn find_default(&mut self, uid: Uuid) -> AppResult<Option<Address>> {
        Ok(self
            .work
            .addresses
            .iter()
            .find(|a| a.uid == uid && a.is_default)
            .cloned())
    }

    async fn find_first(&mut self, uid: Uuid) -> AppResult<Option<Address>> {
        Ok(self.work.addresses.iter().find(|a| a.uid == uid).cloned())
    }

    async fn list(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Address>> {
        let rows = self
            .work
            .addresses
            .iter()
            .filter(|a| a.uid == uid)
            .cloned()
            .collect();
        Ok(page_of(rows, |a| a.created_at, query))
    }

    async fn create(&mut self, data: NewAddress) -> AppResult<Address> {
        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            uid: data.uid,
            name: data.name,
            phone: data.phone,
            province_code: data.province_code,
            city_code: data.city_code,
            area_code: data.area_code,
            address: data.address,
            is_default: data.is_default,
            created_at: now,
            updated_at: now,
        };
        self.work.addresses.push(address.clone());
        Ok(address)
    }

    async fn update(&mut self, address: &Address) -> AppResult<Address> {
        let row = self
            .work
            .addresses
            .iter_mut()
            .find(|a| a.id == address.id && a.uid == address.uid)
            .ok_or_else(|| AppError::not_found("address does not exist"))?;
        *row = Address {
            created_at: row.created_at,
            updated_at: Utc::now(),
            ..address.clone()
        };
        Ok(row.clone())
    }

    async fn set_default_flag(&mut self, id: Uuid, is_default: bool) -> AppResult<()> {
        if let Some(row) = self.work.addresses.iter_mut().find(|a| a.id == id) {
            row.is_default = is_default;
        }
        Ok(())
    }

    async fn delete(&mut self, id: Uuid, uid: Uuid) -> AppResult<bool> {
        let before = self.work.addresses.len();
        self.work
            .addresses
            .retain(|a| !(a.id == id && a.uid == uid));
        Ok(self.work.addresses.len() < before)
    }
}

#[async_trait]
impl BannerStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Banner>> {
        Ok(self.work.banners.iter().find(|b| b.id == id).cloned())
    }

    async fn list(
        &mut self,
        platform: Option<BannerPlatform>,
        query: Query,
    ) -> AppResult<Paged<Banner>> {
        let mut rows: Vec<Banner> = self
            .work
            .banners
            .iter()
            .filter(|b| platform.is_none_or(|p| b.platform == p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.created_at.cmp(&a.created_at))
        });
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.limit.max(0) as usize)
            .collect();
        Ok(Paged::new(items, total, query))
    }

    async fn create(&mut self, data: NewBanner) -> AppResult<Banner> {
        let now = Utc::now();
        let banner = Banner {
            id: Uuid::new_v4(),
            image: data.image,
            href: data.href,
            platform: data.platform,
            description: data.description,
            priority: data.priority,
            created_at: now,
            updated_at: now,
        };
        self.work.banners.push(banner.clone());
        Ok(banner)
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let before = self.work.banners.len();
        self.work.banners.retain(|b| b.id != id);
        Ok(self.work.banners.len() < before)
    }
}

#[async_trait]
impl MessageStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Message>> {
        Ok(self.work.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Message>> {
        Ok(self
            .work
            .messages
            .iter()
            .find(|m| m.id == id && m.uid == uid)
            .cloned())
    }

    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Message>> {
        let rows = self
            .work
            .messages
            .iter()
            .filter(|m| m.uid == uid)
            .cloned()
            .collect();
        Ok(page_of(rows, |m| m.created_at, query))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Message>> {
        Ok(page_of(self.work.messages.clone(), |m| m.created_at, query))
    }

    async fn create(&mut self, data: NewMessage) -> AppResult<Message> {
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            uid: data.uid,
            title: data.title,
            content: data.content,
            read: false,
            read_at: None,
            created_at: now,
            updated_at: now,
        };
        self.work.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_read(&mut self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Message>> {
        Ok(self
            .work
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .map(|m| {
                m.read = true;
                m.read_at = Some(at);
                m.clone()
            }))
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let before = self.work.messages.len();
        self.work.messages.retain(|m| m.id != id);
        Ok(self.work.messages.len() < before)
    }
}

#[async_trait]
impl NotificationStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .work
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Notification>> {
        Ok(page_of(
            self.work.notifications.clone(),
            |n| n.created_at,
            query,
        ))
    }

    async fn create(&mut self, data: NewNotification) -> AppResult<Notification> {
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            author: data.author,
            title: data.title,
            content: data.content,
            note: data.note,
            created_at: now,
            updated_at: now,
        };
        self.work.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn delete(&mut self, id: Uuid) -> AppResult<bool> {
        let before = self.work.notifications.len();
        self.work.notifications.retain(|n| n.id != id);
        self.work
            .notification_marks
            .retain(|m| m.notification_id != id);
        Ok(self.work.notifications.len() < before)
    }

    async fn find_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<NotificationMark>> {
        Ok(self
            .work
            .notification_marks
            .iter()
            .filter(|m| m.notification_id == id && m.uid == uid)
            .max_by_key(|m| m.created_at)
            .cloned())
    }

    async fn find_marks(&mut self, ids: &[Uuid], uid: Uuid) -> AppResult<Vec<NotificationMark>> {
        Ok(self
            .work
            .notification_marks
            .iter()
            .filter(|m| m.uid == uid && ids.contains(&m.notification_id))
            .cloned()
            .collect())
    }

    async fn create_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<NotificationMark> {
        let exists = self
            .work
            .notification_marks
            .iter()
            .any(|m| m.notification_id == id && m.uid == uid);
        if exists {
            return Err(AppError::conflict("notification already read"));
        }
        let mark = NotificationMark {
            id: Uuid::new_v4(),
            notification_id: id,
            uid,
            created_at: Utc::now(),
        };
        self.work.notification_marks.push(mark.clone());
        Ok(mark)
    }
}

#[async_trait]
impl ReportStore for MemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Report>> {
        Ok(self.work.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Report>> {
        Ok(self
            .work
            .reports
            .iter()
            .find(|r| r.id == id && r.uid == uid)
            .cloned())
    }

    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Report>> {
        let rows = self
            .work
            .reports
            .iter()
            .filter(|r| r.uid == uid)
            .cloned()
            .collect();
        Ok(page_of(rows, |r| r.created_at, query))
    }

    async fn list(&mut self, query: Query) -> AppResult<Paged<Report>> {
        Ok(page_of(self.work.reports.clone(), |r| r.created_at, query))
    }

    async fn create(&mut self, data: NewReport) -> AppResult<Report> {
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            uid: data.uid,
            title: data.title,
            content: data.content,
            kind: data.kind,
            status: ReportStatus::Pending,
            screenshots: data.screenshots,
            created_at: now,
            updated_at: now,
        };
        self.work.reports.push(report.clone());
        Ok(report)
    }

    async fn update_status(
        &mut self,
        id: Uuid,
        status: ReportStatus,
    ) -> AppResult<Option<Report>> {
        Ok(self
            .work
            .reports
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| {
                r.status = status;
                r.updated_at = Utc::now();
                r.clone()
            }))
    }
}
