//! The response envelope every operation returns.
//!
//! Logical failure travels inside the envelope (`status` + `message`), never
//! through the transport status code.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::pagination::Paged;

/// Outcome flag of an envelope. Serialized as `1` / `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// The operation failed; see `message`.
    #[default]
    Fail,
    /// The operation succeeded.
    Success,
}

impl Status {
    /// Integer wire value.
    pub fn code(self) -> i32 {
        match self {
            Self::Fail => 0,
            Self::Success => 1,
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i32::deserialize(deserializer)? {
            1 => Ok(Self::Success),
            _ => Ok(Self::Fail),
        }
    }
}

/// Single-result envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    /// Success or failure.
    pub status: Status,
    /// Empty on success, the human-readable cause on failure.
    pub message: String,
    /// Payload; `null` on failure unless the operation supplies a fallback.
    pub data: Option<T>,
}

impl<T> Response<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Success,
            message: String::new(),
            data: Some(data),
        }
    }

    /// A failed envelope; `data` is cleared.
    pub fn fail(err: &AppError) -> Self {
        Self {
            status: Status::Fail,
            message: err.message.clone(),
            data: None,
        }
    }

    /// A failed envelope that still carries a payload (e.g. `false`).
    pub fn fail_with(err: &AppError, data: T) -> Self {
        Self {
            status: Status::Fail,
            message: err.message.clone(),
            data: Some(data),
        }
    }

    /// Returns `true` when `status` is success.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl<T> From<AppResult<T>> for Response<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::fail(&err),
        }
    }
}

/// Pagination metadata attached to list envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Page index (0-based).
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Number of items in this page.
    pub num: i64,
    /// Total matching rows.
    pub total: i64,
}

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List<T> {
    /// Success or failure.
    pub status: Status,
    /// Empty on success, the human-readable cause on failure.
    pub message: String,
    /// Page items; `null` on failure.
    pub data: Option<Vec<T>>,
    /// Paging information; `null` on failure.
    pub meta: Option<Meta>,
}

impl<T> List<T> {
    /// A successful list envelope built from one page.
    pub fn ok(page: Paged<T>) -> Self {
        let meta = Meta {
            page: page.query.page,
            limit: page.query.limit,
            num: page.items.len() as i64,
            total: page.total,
        };
        Self {
            status: Status::Success,
            message: String::new(),
            data: Some(page.items),
            meta: Some(meta),
        }
    }

    /// A failed list envelope; both `data` and `meta` are cleared.
    pub fn fail(err: &AppError) -> Self {
        Self {
            status: Status::Fail,
            message: err.message.clone(),
            data: None,
            meta: None,
        }
    }

    /// Returns `true` when `status` is success.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl<T> From<AppResult<Paged<T>>> for List<T> {
    fn from(result: AppResult<Paged<T>>) -> Self {
        match result {
            Ok(page) => Self::ok(page),
            Err(err) => Self::fail(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, Query};

    #[test]
    fn test_success_envelope_shape() {
        let res = Response::ok(42);
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["status"], 1);
        assert_eq!(json["message"], "");
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn test_failure_clears_data() {
        let res: Response<i32> = Err(AppError::not_found("user does not exist")).into();
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["status"], 0);
        assert_eq!(json["message"], "user does not exist");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_fail_with_keeps_fallback() {
        let res = Response::fail_with(&AppError::external("smtp down"), false);
        assert!(!res.is_success());
        assert_eq!(res.data, Some(false));
    }

    #[test]
    fn test_list_meta_uses_defaults() {
        let query = Query::default().normalize();
        let list = List::ok(Paged::new(vec!["a", "b"], 7, query));
        let meta = list.meta.unwrap();
        assert_eq!(meta.page, DEFAULT_PAGE);
        assert_eq!(meta.limit, DEFAULT_LIMIT);
        assert_eq!(meta.num, 2);
        assert_eq!(meta.total, 7);
    }

    #[test]
    fn test_failed_list_has_no_meta() {
        let list: List<i32> = Err(AppError::database("boom")).into();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json["meta"].is_null());
        assert!(json["data"].is_null());
        assert_eq!(json["status"], 0);
    }

    #[test]
    fn test_status_roundtrip_from_integer() {
        let status: Status = serde_json::from_str("1").unwrap();
        assert_eq!(status, Status::Success);
        let status: Status = serde_json::from_str("0").unwrap();
        assert_eq!(status, Status::Fail);
    }
}
