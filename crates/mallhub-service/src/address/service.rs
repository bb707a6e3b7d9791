//! Address operations.
//!
//! Default-flag rules, applied inside the operation's transaction:
//!
//! * `is_default: true` clears the owner's current default first.
//! * `is_default: false` stores a non-default address.
//! * no flag on create: default iff the owner has no address yet.
//! * no flag on update: the flag is left as it is.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_database::store::Transaction;
use mallhub_entity::address::{AddressView, NewAddress};

use super::ERR_ADDRESS_NOT_EXIST;
use crate::context::RequestContext;
use crate::unit_of_work::UnitOfWork;
use crate::user::ERR_USER_NOT_EXIST;
use crate::validation::{Validated, region, validate};

/// Request to add an address.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the recipient name"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the recipient phone number"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please choose a province"))]
    pub province_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please choose a city"))]
    pub city_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please choose an area"))]
    pub area_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please enter the detailed address"))]
    pub address: String,
    pub is_default: Option<bool>,
}

impl Validated for CreateAddressRequest {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "phone",
        "province_code",
        "city_code",
        "area_code",
        "address",
    ];

    fn check_whitelist(&self) -> AppResult<()> {
        region::check_province(&self.province_code)?;
        region::check_city(&self.city_code)?;
        region::check_area(&self.area_code)
    }
}

/// Request to change an address; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(min = 1, message = "please enter the recipient name"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "please enter the recipient phone number"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "please choose a province"))]
    pub province_code: Option<String>,
    #[validate(length(min = 1, message = "please choose a city"))]
    pub city_code: Option<String>,
    #[validate(length(min = 1, message = "please choose an area"))]
    pub area_code: Option<String>,
    #[validate(length(min = 1, message = "please enter the detailed address"))]
    pub address: Option<String>,
    pub is_default: Option<bool>,
}

impl Validated for UpdateAddressRequest {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "phone",
        "province_code",
        "city_code",
        "area_code",
        "address",
    ];

    fn check_whitelist(&self) -> AppResult<()> {
        if let Some(code) = &self.province_code {
            region::check_province(code)?;
        }
        if let Some(code) = &self.city_code {
            region::check_city(code)?;
        }
        if let Some(code) = &self.area_code {
            region::check_area(code)?;
        }
        Ok(())
    }
}

/// Clear the owner's current default address, except `keep`.
///
/// Finding no default is not an error.
async fn clear_default(
    tx: &mut (dyn Transaction + 'static),
    uid: Uuid,
    keep: Option<Uuid>,
) -> AppResult<()> {
    if let Some(current) = tx.addresses().find_default(uid).await?
        && Some(current.id) != keep
    {
        tx.addresses().set_default_flag(current.id, false).await?;
        debug!(address_id = %current.id, "Cleared previous default address");
    }
    Ok(())
}

/// Handles the caller's addresses.
#[derive(Debug, Clone)]
pub struct AddressService {
    uow: UnitOfWork,
}

impl AddressService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Adds an address for the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateAddressRequest,
    ) -> AppResult<AddressView> {
        validate(&input)?;

        let uid = ctx.actor_id;
        let address = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    if tx.users().find_by_id(uid).await?.is_none() {
                        return Err(AppError::not_found(ERR_USER_NOT_EXIST));
                    }

                    let is_default = match input.is_default {
                        Some(true) => {
                            clear_default(tx, uid, None).await?;
                            true
                        }
                        Some(false) => false,
                        None => tx.addresses().find_first(uid).await?.is_none(),
                    };

                    tx.addresses()
                        .create(NewAddress {
                            uid,
                            name: input.name,
                            phone: input.phone,
                            province_code: input.province_code,
                            city_code: input.city_code,
                            area_code: input.area_code,
                            address: input.address,
                            is_default,
                        })
                        .await
                })
            })
            .await?;

        info!(address_id = %address.id, user_id = %uid, is_default = address.is_default, "Address created");
        Ok(AddressView::from(&address))
    }

    /// Changes one of the caller's addresses.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateAddressRequest,
    ) -> AppResult<AddressView> {
        validate(&input)?;

        let uid = ctx.actor_id;
        let address = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let mut address = tx
                        .addresses()
                        .find_by_id(id, uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_ADDRESS_NOT_EXIST))?;

                    if let Some(name) = input.name {
                        address.name = name;
                    }
                    if let Some(phone) = input.phone {
                        address.phone = phone;
                    }
                    if let Some(code) = input.province_code {
                        address.province_code = code;
                    }
                    if let Some(code) = input.city_code {
                        address.city_code = code;
                    }
                    if let Some(code) = input.area_code {
                        address.area_code = code;
                    }
                    if let Some(detail) = input.address {
                        address.address = detail;
                    }
                    if let Some(flag) = input.is_default {
                        if flag {
                            clear_default(tx, uid, Some(address.id)).await?;
                        }
                        address.is_default = flag;
                    }

                    tx.addresses().update(&address).await
                })
            })
            .await?;

        info!(address_id = %address.id, "Address updated");
        Ok(AddressView::from(&address))
    }

    /// One of the caller's addresses.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<AddressView> {
        let uid = ctx.actor_id;
        let address = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.addresses()
                        .find_by_id(id, uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_ADDRESS_NOT_EXIST))
                })
            })
            .await?;
        Ok(AddressView::from(&address))
    }

    /// The caller's address list, newest first.
    pub async fn list(&self, ctx: &RequestContext, query: Query) -> AppResult<Paged<AddressView>> {
        let uid = ctx.actor_id;
        let query = query.normalize();
        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.addresses().list(uid, query).await }))
            .await?;
        Ok(page.map(|a| AddressView::from(&a)))
    }

    /// Deletes one of the caller's addresses and returns it.
    ///
    /// Deleting the default address leaves the owner without one.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<AddressView> {
        let uid = ctx.actor_id;
        let address = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let address = tx
                        .addresses()
                        .find_by_id(id, uid)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_ADDRESS_NOT_EXIST))?;
                    tx.addresses().delete(id, uid).await?;
                    Ok(address)
                })
            })
            .await?;

        info!(address_id = %id, "Address deleted");
        Ok(AddressView::from(&address))
    }
}
