//! Catalogue products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};
use crate::validation::{ValidationError, bounded, required};

/// Name reserved for the sentinel product that generic contact-form
/// submissions are filed against.
pub const GENERAL_INQUIRY_NAME: &str = "General Inquiry";

const NAME_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 5_000;
const CATEGORY_MAX: usize = 100;
const URL_MAX: usize = 2_048;

/// Whether `name` is the reserved sentinel name (case-insensitive).
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(GENERAL_INQUIRY_NAME)
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive match of `query` against name, description and category.
    /// An empty query matches everything.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || [&self.name, &self.description, &self.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
    }
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: Some(product.price),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            featured: product.featured,
        }
    }
}

/// Create payload. Missing fields fall back to defaults and are then
/// rejected by [`ProductInput::validate`] where required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Option<Price>,
    pub category: String,
    pub image_url: String,
    pub featured: bool,
}

impl ProductInput {
    /// Check required fields and normalize whitespace.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        Ok(NewProduct {
            name: required("name", &self.name, NAME_MAX)?,
            description: required("description", &self.description, DESCRIPTION_MAX)?,
            price: self
                .price
                .ok_or(ValidationError::Required { field: "price" })?,
            category: bounded("category", &self.category, CATEGORY_MAX)?,
            image_url: bounded("imageUrl", &self.image_url, URL_MAX)?,
            featured: self.featured,
        })
    }
}

/// A validated product ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
    pub featured: bool,
}

impl NewProduct {
    /// The sentinel record seeded at setup time.
    #[must_use]
    pub fn general_inquiry() -> Self {
        Self {
            name: GENERAL_INQUIRY_NAME.to_owned(),
            description: "General contact form submission".to_owned(),
            price: Price::ZERO,
            category: "General".to_owned(),
            image_url: "/images/general-inquiry.jpg".to_owned(),
            featured: false,
        }
    }

    /// Reject the sentinel name for ordinary catalogue products.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ReservedName`] if the name is reserved.
    pub fn ensure_unreserved_name(&self) -> Result<(), ValidationError> {
        if is_reserved_name(&self.name) {
            return Err(ValidationError::ReservedName(self.name.clone()));
        }
        Ok(())
    }
}

/// Partial update. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl ProductPatch {
    /// Merge onto `current` and validate the result as a whole.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the merged record is invalid.
    pub fn apply_to(self, current: &Product) -> Result<NewProduct, ValidationError> {
        let mut merged = ProductInput::from(current);
        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(description) = self.description {
            merged.description = description;
        }
        if let Some(price) = self.price {
            merged.price = Some(price);
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(image_url) = self.image_url {
            merged.image_url = image_url;
        }
        if let Some(featured) = self.featured {
            merged.featured = featured;
        }
        merged.validate()
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(product: NewProduct) -> Self {
        Self {
            name: Some(product.name),
            description: Some(product.description),
            price: Some(product.price),
            category: Some(product.category),
            image_url: Some(product.image_url),
            featured: Some(product.featured),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::generate(),
            name: "Black Galaxy Slab".into(),
            description: "Polished black granite with gold flecks".into(),
            price: Price::new(Decimal::new(45_000, 2)).unwrap(),
            category: "Slabs".into(),
            image_url: String::new(),
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_missing_fields_are_required() {
        let input: ProductInput = serde_json::from_str(r#"{"name":"Slab"}"#).unwrap();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "description" })
        );

        let input: ProductInput =
            serde_json::from_str(r#"{"name":"Slab","description":"d"}"#).unwrap();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "price" })
        );
    }

    #[test]
    fn test_defaults_applied() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name":" Slab ","description":"d","price":10}"#).unwrap();
        let new = input.validate().unwrap();
        assert_eq!(new.name, "Slab");
        assert_eq!(new.category, "");
        assert_eq!(new.image_url, "");
        assert!(!new.featured);
    }

    #[test]
    fn test_reserved_name_is_case_insensitive() {
        assert!(is_reserved_name(" general inquiry "));
        assert!(!is_reserved_name("General Inquiry Desk"));
        assert!(NewProduct::general_inquiry().ensure_unreserved_name().is_err());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let current = product();
        let patch: ProductPatch = serde_json::from_str(r#"{"featured":true}"#).unwrap();
        let merged = patch.apply_to(&current).unwrap();
        assert!(merged.featured);
        assert_eq!(merged.name, current.name);
        assert_eq!(merged.price, current.price);
    }

    #[test]
    fn test_patch_revalidates() {
        let patch: ProductPatch = serde_json::from_str(r#"{"name":"  "}"#).unwrap();
        assert_eq!(
            patch.apply_to(&product()),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        assert!(serde_json::from_str::<ProductPatch>(r#"{"stock":4}"#).is_err());
    }

    #[test]
    fn test_matches_search() {
        let p = product();
        assert!(p.matches_search(""));
        assert!(p.matches_search("GALAXY"));
        assert!(p.matches_search("slabs"));
        assert!(p.matches_search("gold"));
        assert!(!p.matches_search("marble"));
    }

    #[test]
    fn test_json_is_camel_case() {
        let json = serde_json::to_value(product()).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["price"], serde_json::json!(450.0));
    }
}
