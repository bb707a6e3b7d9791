//! Store abstraction: a database hands out transactions, and a transaction
//! exposes one store per table.
//!
//! Every read and write of an operation goes through the same
//! [`Transaction`], so all of them commit or roll back together. Lookups
//! that may legitimately find nothing return `Ok(None)`; `Err` is reserved
//! for real failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::address::{Address, NewAddress};
use mallhub_entity::admin::{Admin, AdminField, NewAdmin};
use mallhub_entity::banner::{Banner, BannerPlatform, NewBanner};
use mallhub_entity::message::{Message, NewMessage};
use mallhub_entity::notification::{NewNotification, Notification, NotificationMark};
use mallhub_entity::report::{NewReport, Report, ReportStatus};
use mallhub_entity::user::{NewUser, User};

/// Source of transactions.
#[async_trait]
pub trait Database: Send + Sync + std::fmt::Debug + 'static {
    /// Open a new transaction.
    async fn begin(&self) -> AppResult<Box<dyn Transaction>>;
}

/// One open transaction.
///
/// Dropping a transaction without committing discards its writes.
#[async_trait]
pub trait Transaction: Send {
    fn users(&mut self) -> &mut dyn UserStore;
    fn admins(&mut self) -> &mut dyn AdminStore;
    fn addresses(&mut self) -> &mut dyn AddressStore;
    fn banners(&mut self) -> &mut dyn BannerStore;
    fn messages(&mut self) -> &mut dyn MessageStore;
    fn notifications(&mut self) -> &mut dyn NotificationStore;
    fn reports(&mut self) -> &mut dyn ReportStore;

    /// Make every write of this transaction durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// `users` table.
#[async_trait]
pub trait UserStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_phone(&mut self, phone: &str) -> AppResult<Option<User>>;
    /// Insert a user; a taken username, email, or phone is a `Conflict`.
    async fn create(&mut self, data: NewUser) -> AppResult<User>;
    /// Returns `false` when no such user exists.
    async fn update_password(&mut self, id: Uuid, password_hash: &str) -> AppResult<bool>;
}

/// `admins` table.
#[async_trait]
pub trait AdminStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Admin>>;
    async fn find_by_username(&mut self, username: &str) -> AppResult<Option<Admin>>;
    /// Insert an admin; a taken username is a `Conflict`.
    async fn create(&mut self, data: NewAdmin) -> AppResult<Admin>;
    async fn list(&mut self, query: Query) -> AppResult<Paged<Admin>>;
    /// Delete every admin whose `field` equals `value`; returns the count.
    async fn delete_by_field(&mut self, field: AdminField, value: &str) -> AppResult<u64>;
}

/// `addresses` table. Every lookup is scoped to the owner.
#[async_trait]
pub trait AddressStore: Send {
    async fn find_by_id(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Address>>;
    /// The owner's current default address, if any.
    async fn find_default(&mut self, uid: Uuid) -> AppResult<Option<Address>>;
    /// Any one of the owner's addresses, if the owner has one.
    async fn find_first(&mut self, uid: Uuid) -> AppResult<Option<Address>>;
    async fn list(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Address>>;
    async fn create(&mut self, data: NewAddress) -> AppResult<Address>;
    /// Persist every mutable column of `address` and bump `updated_at`.
    async fn update(&mut self, address: &Address) -> AppResult<Address>;
    /// Set only the default flag, leaving `updated_at` untouched.
    async fn set_default_flag(&mut self, id: Uuid, is_default: bool) -> AppResult<()>;
    async fn delete(&mut self, id: Uuid, uid: Uuid) -> AppResult<bool>;
}

/// `banners` table.
#[async_trait]
pub trait BannerStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Banner>>;
    /// Ordered by priority, newest first within a priority.
    async fn list(
        &mut self,
        platform: Option<BannerPlatform>,
        query: Query,
    ) -> AppResult<Paged<Banner>>;
    async fn create(&mut self, data: NewBanner) -> AppResult<Banner>;
    async fn delete(&mut self, id: Uuid) -> AppResult<bool>;
}

/// `messages` table.
#[async_trait]
pub trait MessageStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Message>>;
    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Message>>;
    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Message>>;
    async fn list(&mut self, query: Query) -> AppResult<Paged<Message>>;
    async fn create(&mut self, data: NewMessage) -> AppResult<Message>;
    /// Flag a message as read at `at`; returns the updated row.
    async fn mark_read(&mut self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Message>>;
    async fn delete(&mut self, id: Uuid) -> AppResult<bool>;
}

/// `notifications` and `notification_marks` tables.
#[async_trait]
pub trait NotificationStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Notification>>;
    async fn list(&mut self, query: Query) -> AppResult<Paged<Notification>>;
    async fn create(&mut self, data: NewNotification) -> AppResult<Notification>;
    /// Delete a notification together with its read marks.
    async fn delete(&mut self, id: Uuid) -> AppResult<bool>;
    /// The most recent mark of `uid` on notification `id`.
    async fn find_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<NotificationMark>>;
    /// Every mark of `uid` on any of `ids`, in one round-trip.
    async fn find_marks(&mut self, ids: &[Uuid], uid: Uuid) -> AppResult<Vec<NotificationMark>>;
    async fn create_mark(&mut self, id: Uuid, uid: Uuid) -> AppResult<NotificationMark>;
}

/// `reports` table.
#[async_trait]
pub trait ReportStore: Send {
    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Report>>;
    async fn find_for_user(&mut self, id: Uuid, uid: Uuid) -> AppResult<Option<Report>>;
    async fn list_for_user(&mut self, uid: Uuid, query: Query) -> AppResult<Paged<Report>>;
    async fn list(&mut self, query: Query) -> AppResult<Paged<Report>>;
    async fn create(&mut self, data: NewReport) -> AppResult<Report>;
    async fn update_status(&mut self, id: Uuid, status: ReportStatus)
    -> AppResult<Option<Report>>;
}
