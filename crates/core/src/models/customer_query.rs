//! Customer inquiries submitted through the contact and product forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::{CustomerQueryId, Email, ProductId, QueryStatus};
use crate::validation::{ValidationError, required};

const NAME_MAX: usize = 200;
const PHONE_MAX: usize = 40;
const MESSAGE_MAX: usize = 5_000;

/// A stored customer query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub id: CustomerQueryId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub message: String,
    pub product_id: ProductId,
    pub status: QueryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer query with its referenced product expanded.
///
/// `product` is `None` when the product has been deleted since the query
/// was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQueryDetail {
    #[serde(flatten)]
    pub query: CustomerQuery,
    pub product: Option<Product>,
}

/// Submission payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerQueryInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub product_id: Option<ProductId>,
}

impl CustomerQueryInput {
    /// # Errors
    ///
    /// Returns the first failing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<NewCustomerQuery, ValidationError> {
        Ok(NewCustomerQuery {
            name: required("name", &self.name, NAME_MAX)?,
            email: Email::parse(&self.email)?,
            phone: required("phone", &self.phone, PHONE_MAX)?,
            message: required("message", &self.message, MESSAGE_MAX)?,
            product_id: self
                .product_id
                .ok_or(ValidationError::Required { field: "productId" })?,
        })
    }
}

/// A validated submission. New queries always start as
/// [`QueryStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerQuery {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub message: String,
    pub product_id: ProductId,
}

/// Partial update. The product reference cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerQueryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QueryStatus>,
}

impl CustomerQueryPatch {
    /// Patch that only moves the query to `status`.
    #[must_use]
    pub fn status(status: QueryStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Merge onto `current` and validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a patched field is invalid.
    pub fn apply_to(self, current: &CustomerQuery) -> Result<CustomerQueryUpdate, ValidationError> {
        Ok(CustomerQueryUpdate {
            name: match self.name {
                Some(name) => required("name", &name, NAME_MAX)?,
                None => current.name.clone(),
            },
            email: match self.email {
                Some(email) => Email::parse(&email)?,
                None => current.email.clone(),
            },
            phone: match self.phone {
                Some(phone) => required("phone", &phone, PHONE_MAX)?,
                None => current.phone.clone(),
            },
            message: match self.message {
                Some(message) => required("message", &message, MESSAGE_MAX)?,
                None => current.message.clone(),
            },
            status: self.status.unwrap_or(current.status),
        })
    }
}

/// Full set of mutable fields after a patch is merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerQueryUpdate {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub message: String,
    pub status: QueryStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::EmailError;

    fn query() -> CustomerQuery {
        let now = Utc::now();
        CustomerQuery {
            id: CustomerQueryId::generate(),
            name: "A".into(),
            email: Email::parse("a@x.com").unwrap(),
            phone: "1".into(),
            message: "hi".into(),
            product_id: ProductId::generate(),
            status: QueryStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validate_full_submission() {
        let id = ProductId::generate();
        let input: CustomerQueryInput = serde_json::from_value(serde_json::json!({
            "name": "A", "email": "a@x.com", "phone": "1", "message": "hi", "productId": id,
        }))
        .unwrap();
        let new = input.validate().unwrap();
        assert_eq!(new.product_id, id);
        assert_eq!(new.email.as_str(), "a@x.com");
    }

    #[test]
    fn test_validate_requires_product() {
        let input = CustomerQueryInput {
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "1".into(),
            message: "hi".into(),
            product_id: None,
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "productId" })
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let input = CustomerQueryInput {
            email: "nope".into(),
            ..CustomerQueryInput::default()
        };
        // name is checked first
        assert_eq!(input.validate().unwrap_err().field(), "name");

        let input = CustomerQueryInput {
            name: "A".into(),
            email: "nope".into(),
            ..CustomerQueryInput::default()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::Email(EmailError::AtSymbol))
        );
    }

    #[test]
    fn test_status_patch_changes_only_status() {
        let current = query();
        let update = CustomerQueryPatch::status(QueryStatus::Responded)
            .apply_to(&current)
            .unwrap();
        assert_eq!(update.status, QueryStatus::Responded);
        assert_eq!(update.name, current.name);
        assert_eq!(update.email, current.email);
        assert_eq!(update.message, current.message);
    }

    #[test]
    fn test_patch_rejects_product_change() {
        let err = serde_json::from_str::<CustomerQueryPatch>(
            r#"{"productId":"00000000-0000-0000-0000-000000000001"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        assert!(serde_json::from_str::<CustomerQueryPatch>(r#"{"status":"archived"}"#).is_err());
    }

    #[test]
    fn test_detail_flattens_query() {
        let detail = CustomerQueryDetail {
            query: query(),
            product: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json["product"].is_null());
        assert!(json.get("productId").is_some());
    }
}
