//! Notification operations.
//!
//! A notification is broadcast to every user; reading it leaves a mark for
//! that user. The user-facing list derives each row's read state from the
//! caller's marks, fetched in one batch per page.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_database::store::Transaction;
use mallhub_entity::notification::{
    NewNotification, NotificationAdminView, NotificationMark, NotificationView,
};

use super::ERR_NOTIFICATION_NOT_EXIST;
use crate::context::RequestContext;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{Validated, validate};

/// Request to broadcast a notification.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "please enter a title"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the content"))]
    pub content: String,
    #[validate(length(max = 255, message = "note must be at most 255 characters"))]
    pub note: Option<String>,
}

impl Validated for CreateNotificationRequest {
    const FIELDS: &'static [&'static str] = &["title", "content", "note"];
}

/// Marks `id` read for `uid` unless a mark already exists.
///
/// Returns the mark that now represents the read.
async fn ensure_mark(
    tx: &mut (dyn Transaction + 'static),
    id: Uuid,
    uid: Uuid,
) -> AppResult<NotificationMark> {
    if let Some(mark) = tx.notifications().find_mark(id, uid).await? {
        return Ok(mark);
    }
    debug!(notification_id = %id, user_id = %uid, "Creating read mark");
    tx.notifications().create_mark(id, uid).await
}

/// Handles notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    uow: UnitOfWork,
}

impl NotificationService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Broadcasts a notification authored by the calling admin.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateNotificationRequest,
    ) -> AppResult<NotificationAdminView> {
        validate(&input)?;

        let author = ctx.actor_id;
        let notification = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.notifications()
                        .create(NewNotification {
                            author,
                            title: input.title,
                            content: input.content,
                            note: input.note,
                        })
                        .await
                })
            })
            .await?;

        info!(notification_id = %notification.id, author = %author, "Notification created");
        Ok(NotificationAdminView::from(&notification))
    }

    /// One page of notifications with the caller's read state per row.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        query: Query,
    ) -> AppResult<Paged<NotificationView>> {
        let uid = ctx.actor_id;
        let query = query.normalize();

        self.uow
            .run(move |tx| {
                Box::pin(async move {
                    let page = tx.notifications().list(query).await?;
                    let ids: Vec<Uuid> = page.items.iter().map(|n| n.id).collect();
                    let marks = tx.notifications().find_marks(&ids, uid).await?;
                    let latest = NotificationMark::latest_per_notification(marks);

                    Ok(page.map(|n| NotificationView::new(&n, latest.get(&n.id))))
                })
            })
            .await
    }

    /// One notification; viewing it marks it read.
    pub async fn get_for_user(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<NotificationView> {
        let uid = ctx.actor_id;
        self.uow
            .run(move |tx| {
                Box::pin(async move {
                    let notification = tx
                        .notifications()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_NOTIFICATION_NOT_EXIST))?;
                    let mark = ensure_mark(tx, id, uid).await?;
                    Ok(NotificationView::new(&notification, Some(&mark)))
                })
            })
            .await
    }

    /// Marks one notification read for the caller. Repeating it is a no-op.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> AppResult<bool> {
        let uid = ctx.actor_id;
        self.uow
            .run(move |tx| {
                Box::pin(async move {
                    if tx.notifications().find_by_id(id).await?.is_none() {
                        return Err(AppError::not_found(ERR_NOTIFICATION_NOT_EXIST));
                    }
                    ensure_mark(tx, id, uid).await?;
                    Ok(true)
                })
            })
            .await
    }

    /// Every notification, for admins.
    pub async fn list(&self, query: Query) -> AppResult<Paged<NotificationAdminView>> {
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.notifications().list(query).await }))
            .await?;
        Ok(page.map(|n| NotificationAdminView::from(&n)))
    }

    /// One notification, for admins.
    pub async fn get(&self, id: Uuid) -> AppResult<NotificationAdminView> {
        let notification = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.notifications()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_NOTIFICATION_NOT_EXIST))
                })
            })
            .await?;
        Ok(NotificationAdminView::from(&notification))
    }

    /// Removes a notification with its read marks and returns it.
    pub async fn delete(&self, id: Uuid) -> AppResult<NotificationAdminView> {
        let notification = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let notification = tx
                        .notifications()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_NOTIFICATION_NOT_EXIST))?;
                    tx.notifications().delete(id).await?;
                    Ok(notification)
                })
            })
            .await?;

        info!(notification_id = %id, "Notification deleted");
        Ok(NotificationAdminView::from(&notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallhub_database::MemoryDatabase;

    use crate::testing::{seed_admin, seed_user, uow};

    fn request(title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            title: title.into(),
            content: "the store closes early today".into(),
            note: None,
        }
    }

    async fn setup(n: usize) -> (MemoryDatabase, NotificationService, RequestContext, Vec<Uuid>) {
        let db = MemoryDatabase::new();
        let admin = seed_admin(&db, "root", true).await;
        let user = seed_user(&db, "grace", "grace@example.com", "13300000000").await;
        let svc = NotificationService::new(uow(&db));
        let admin_ctx = RequestContext::admin(admin.id);

        let mut ids = Vec::new();
        for i in 0..n {
            let created = svc.create(&admin_ctx, request(&format!("notice {i}"))).await.unwrap();
            ids.push(created.id);
        }
        (db, svc, RequestContext::user(user.id), ids)
    }

    #[tokio::test]
    async fn test_reading_one_of_three_marks_only_that_one() {
        let (db, svc, ctx, ids) = setup(3).await;

        let viewed = svc.get_for_user(&ctx, ids[1]).await.unwrap();
        assert!(viewed.read);

        let page = svc.list_for_user(&ctx, Query::default()).await.unwrap();
        assert_eq!(page.items.len(), 3);
        let read: Vec<_> = page.items.iter().filter(|n| n.read).collect();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, ids[1]);
        assert!(!read[0].read_at.is_empty());
        for unread in page.items.iter().filter(|n| !n.read) {
            assert_eq!(unread.read_at, "");
        }
        assert_eq!(db.snapshot().await.notification_marks.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let (db, svc, ctx, ids) = setup(1).await;

        assert!(svc.mark_read(&ctx, ids[0]).await.unwrap());
        assert!(svc.mark_read(&ctx, ids[0]).await.unwrap());
        svc.get_for_user(&ctx, ids[0]).await.unwrap();

        assert_eq!(db.snapshot().await.notification_marks.len(), 1);
    }

    #[tokio::test]
    async fn test_marks_are_per_user() {
        let (db, svc, ctx, ids) = setup(1).await;
        let other = seed_user(&db, "heidi", "heidi@example.com", "13200000000").await;

        svc.mark_read(&ctx, ids[0]).await.unwrap();
        let page = svc
            .list_for_user(&RequestContext::user(other.id), Query::default())
            .await
            .unwrap();
        assert!(!page.items[0].read);
    }

    #[tokio::test]
    async fn test_delete_removes_marks() {
        let (db, svc, ctx, ids) = setup(1).await;
        svc.mark_read(&ctx, ids[0]).await.unwrap();

        svc.delete(ids[0]).await.unwrap();
        let tables = db.snapshot().await;
        assert!(tables.notifications.is_empty());
        assert!(tables.notification_marks.is_empty());

        let err = svc.mark_read(&ctx, ids[0]).await.unwrap_err();
        assert_eq!(err.message, ERR_NOTIFICATION_NOT_EXIST);
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let (db, svc, _ctx, _) = setup(0).await;
        let before = db.begin_count();

        let err = svc
            .create(&RequestContext::admin(Uuid::new_v4()), request(""))
            .await
            .unwrap_err();
        assert_eq!(err.message, "please enter a title");
        assert_eq!(db.begin_count(), before);
    }
}
