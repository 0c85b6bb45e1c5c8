use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::AppError;

/// A category a point of interest can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Canonical tag stored on POIs.
    pub tag: &'static str,
    /// Kakao category group code.
    pub code: &'static str,
    pub name: &'static str,
}

pub const KNOWN_CATEGORIES: &[Category] = &[
    Category { tag: "mart", code: "MT1", name: "대형마트" },
    Category { tag: "convenience_store", code: "CS2", name: "편의점" },
    Category { tag: "kindergarten", code: "PS3", name: "어린이집·유치원" },
    Category { tag: "school", code: "SC4", name: "학교" },
    Category { tag: "academy", code: "AC5", name: "학원" },
    Category { tag: "parking", code: "PK6", name: "주차장" },
    Category { tag: "gas_station", code: "OL7", name: "주유·충전" },
    Category { tag: "real_estate_agency", code: "AG2", name: "중개업소" },
    Category { tag: "lodging", code: "AD5", name: "숙박" },
    Category { tag: "restaurant", code: "FD6", name: "음식점" },
    Category { tag: "cafe", code: "CE7", name: "카페" },
    Category { tag: "hospital", code: "HP8", name: "병원" },
    Category { tag: "pharmacy", code: "PM9", name: "약국" },
];

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(KNOWN_CATEGORIES.to_vec())
    }
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Look a category up by tag or group code, ignoring case.
    pub fn resolve(&self, identifier: &str) -> Option<&Category> {
        let identifier = identifier.trim();
        self.categories.iter().find(|category| {
            category.tag.eq_ignore_ascii_case(identifier)
                || category.code.eq_ignore_ascii_case(identifier)
        })
    }

    pub fn is_known_tag(&self, tag: &str) -> bool {
        self.categories.iter().any(|category| category.tag == tag)
    }

    /// Map request identifiers to canonical tags, sorted and de-duplicated.
    ///
    /// Fails when the list is empty or names a category that does not exist.
    pub fn resolve_all(&self, identifiers: &[String]) -> Result<Vec<String>, AppError> {
        if identifiers.is_empty() {
            return Err(AppError::ValidationError(
                "categories must name at least one category".to_string(),
            ));
        }

        let mut tags = BTreeSet::new();
        let mut unknown = Vec::new();
        for identifier in identifiers {
            match self.resolve(identifier) {
                Some(category) => {
                    tags.insert(category.tag.to_string());
                }
                None => unknown.push(identifier.as_str()),
            }
        }

        if !unknown.is_empty() {
            return Err(AppError::ValidationError(format!(
                "unknown categories: {}",
                unknown.join(", ")
            )));
        }

        Ok(tags.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_resolves_tags_and_codes() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.resolve("cafe").map(|c| c.code), Some("CE7"));
        assert_eq!(registry.resolve("ce7").map(|c| c.tag), Some("cafe"));
        assert_eq!(registry.resolve(" PM9 ").map(|c| c.tag), Some("pharmacy"));
        assert!(registry.resolve("nonexistent_tag").is_none());
    }

    #[test]
    fn test_resolve_all_deduplicates() {
        let registry = CategoryRegistry::default();
        let tags = registry
            .resolve_all(&strings(&["CE7", "cafe", "HP8"]))
            .unwrap();
        assert_eq!(tags, strings(&["cafe", "hospital"]));
    }

    #[test]
    fn test_resolve_all_rejects_unknown_and_empty() {
        let registry = CategoryRegistry::default();

        let err = registry
            .resolve_all(&strings(&["cafe", "nonexistent_tag"]))
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("nonexistent_tag")));

        let err = registry.resolve_all(&[]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_every_code_is_unique() {
        let codes: BTreeSet<_> = KNOWN_CATEGORIES.iter().map(|c| c.code).collect();
        let tags: BTreeSet<_> = KNOWN_CATEGORIES.iter().map(|c| c.tag).collect();
        assert_eq!(codes.len(), KNOWN_CATEGORIES.len());
        assert_eq!(tags.len(), KNOWN_CATEGORIES.len());
    }
}
