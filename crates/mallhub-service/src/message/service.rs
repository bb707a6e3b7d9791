//! Message operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::message::{MessageAdminView, MessageView, NewMessage};

use super::ERR_MESSAGE_NOT_EXIST;
use crate::context::RequestContext;
use crate::unit_of_work::UnitOfWork;
use crate::user::ERR_USER_NOT_EXIST;
use crate::validation::{Validated, validate};

/// Request to send a message to one user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub uid: Uuid,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "please enter a title"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the content"))]
    pub content: String,
}

impl Validated for CreateMessageRequest {
    const FIELDS: &'static [&'static str] = &["title", "content"];
}

/// Handles messages.
#[derive(Debug, Clone)]
pub struct MessageService {
    uow: UnitOfWork,
}

impl MessageService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Sends a message; the recipient must exist.
    pub async fn create(&self, input: CreateMessageRequest) -> AppResult<MessageAdminView> {
        validate(&input)?;

        let message = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    if tx.users().find_by_id(input.uid).await?.is_none() {
                        return Err(AppError::not_found(ERR_USER_NOT_EXIST));
                    }
                    tx.messages()
                        .create(NewMessage {
                            uid: input.uid,
                            title: input.title,
                            content: input.content,
                        })
                        .await
                })
            })
            .await?;

        info!(message_id = %message.id, user_id = %message.uid, "Message sent");
        Ok(MessageAdminView::from(&message))
    }

    /// The caller's messages.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        query: Query,
    ) -> AppResult<Paged<MessageView>> {
        let uid = ctx.actor_id;
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.messages().list_for_user(uid, query).await }))
            .await?;
        Ok(page.map(|m| MessageView::from(&m)))
    }

    /// One of the caller's messages; opening it marks it read.
    pub async fn get_for_user(&self, ctx: &RequestContext, id: Uuid) -> AppResult<MessageView> {
        let uid = ctx.actor_id;
        let message = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let message = tx
                        .messages()
                        .find_for_user(id, uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_MESSAGE_NOT_EXIST))?;
                    if message.read {
                        return Ok(message);
                    }
                    tx.messages()
                        .mark_read(id, Utc::now())
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_MESSAGE_NOT_EXIST))
                })
            })
            .await?;
        Ok(MessageView::from(&message))
    }

    /// Every message, for admins.
    pub async fn list(&self, query: Query) -> AppResult<Paged<MessageAdminView>> {
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.messages().list(query).await }))
            .await?;
        Ok(page.map(|m| MessageAdminView::from(&m)))
    }

    /// One message, for admins.
    pub async fn get(&self, id: Uuid) -> AppResult<MessageAdminView> {
        let message = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.messages()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_MESSAGE_NOT_EXIST))
                })
            })
            .await?;
        Ok(MessageAdminView::from(&message))
    }

    /// Removes a message and returns it.
    pub async fn delete(&self, id: Uuid) -> AppResult<MessageAdminView> {
        let message = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let message = tx
                        .messages()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_MESSAGE_NOT_EXIST))?;
                    tx.messages().delete(id).await?;
                    Ok(message)
                })
            })
            .await?;

        info!(message_id = %id, "Message deleted");
        Ok(MessageAdminView::from(&message))
    }
}
