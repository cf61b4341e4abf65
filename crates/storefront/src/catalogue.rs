//! Filtering over fetched product and gallery sets.
//!
//! The API returns whole collections; search, category and tag filters
//! are applied here before rendering.

use std::collections::BTreeSet;

use url::form_urlencoded;

use granite_world_core::{GalleryPost, Product};

/// A filter link rendered as a pill above a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Trimmed, non-empty query parameter.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build `path?key=value&...`, skipping absent values.
fn link(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            query.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", query.finish())
    } else {
        path.to_string()
    }
}

// =============================================================================
// Products
// =============================================================================

/// Keep products matching `category` exactly and `query` case-insensitively.
#[must_use]
pub fn filter_products(
    products: Vec<Product>,
    query: Option<&str>,
    category: Option<&str>,
) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| query.is_none_or(|q| p.matches_search(q)))
        .collect()
}

/// Sorted distinct non-empty categories.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// "All" plus one chip per category. The search term is carried along.
#[must_use]
pub fn category_chips(categories: &[String], active: Option<&str>, query: Option<&str>) -> Vec<Chip> {
    let mut chips = vec![Chip {
        label: "All".to_string(),
        href: link("/products", &[("q", query)]),
        active: active.is_none(),
    }];
    chips.extend(categories.iter().map(|category| Chip {
        label: category.clone(),
        href: link(
            "/products",
            &[("q", query), ("category", Some(category.as_str()))],
        ),
        active: active == Some(category.as_str()),
    }));
    chips
}

// =============================================================================
// Gallery
// =============================================================================

/// The `filter` query parameter of the gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryFilter {
    #[default]
    All,
    Featured,
    Tag(String),
}

impl GalleryFilter {
    /// Parse `all`, `featured` or a tag name. Blank means `All`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match non_blank(raw) {
            None | Some("all") => Self::All,
            Some("featured") => Self::Featured,
            Some(tag) => Self::Tag(tag.to_string()),
        }
    }

    #[must_use]
    pub fn as_param(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Featured => Some("featured"),
            Self::Tag(tag) => Some(tag),
        }
    }
}

/// Apply a tag filter and a text search to fetched posts.
///
/// `Featured` is expected to be served from the featured endpoint, so it
/// only drops non-featured stragglers here.
#[must_use]
pub fn filter_gallery(
    posts: Vec<GalleryPost>,
    filter: &GalleryFilter,
    query: Option<&str>,
) -> Vec<GalleryPost> {
    posts
        .into_iter()
        .filter(|post| match filter {
            GalleryFilter::All => true,
            GalleryFilter::Featured => post.featured,
            GalleryFilter::Tag(tag) => post.has_tag(tag),
        })
        .filter(|post| query.is_none_or(|q| post.matches_search(q)))
        .collect()
}

/// Sorted set of unique tags.
#[must_use]
pub fn gallery_tags(posts: &[GalleryPost]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// "All", "Featured" and one chip per tag.
#[must_use]
pub fn gallery_chips(tags: &[String], active: &GalleryFilter, query: Option<&str>) -> Vec<Chip> {
    let mut chips = vec![
        Chip {
            label: "All".to_string(),
            href: link("/gallery", &[("q", query)]),
            active: *active == GalleryFilter::All,
        },
        Chip {
            label: "Featured".to_string(),
            href: link("/gallery", &[("filter", Some("featured")), ("q", query)]),
            active: *active == GalleryFilter::Featured,
        },
    ];
    chips.extend(tags.iter().map(|tag| Chip {
        label: tag.clone(),
        href: link("/gallery", &[("filter", Some(tag.as_str())), ("q", query)]),
        active: matches!(active, GalleryFilter::Tag(t) if t == tag),
    }));
    chips
}
