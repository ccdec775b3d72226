//! Invalidation rules for catalog writes

use once_cell::sync::Lazy;

use super::requests::{
    Dashboard, GetCategoryById, GetProductById, ListCategories, ListProducts, LowStockProducts,
    SearchProducts,
};
use crate::domain::cache::InvalidationMap;
use crate::domain::pipeline::{Request, Subject};

/// Cached reads purged after each write subject
///
/// The dashboard aggregates both products and categories, so either subject
/// purges it.
pub static INVALIDATION_RULES: Lazy<InvalidationMap> = Lazy::new(|| {
    InvalidationMap::new()
        .with_rule(
            Subject::Product.as_str(),
            &[
                ListProducts::NAME,
                GetProductById::NAME,
                LowStockProducts::NAME,
                SearchProducts::NAME,
                Dashboard::NAME,
            ],
        )
        .with_rule(
            Subject::Category.as_str(),
            &[ListCategories::NAME, GetCategoryById::NAME, Dashboard::NAME],
        )
});

#[cfg(test)]
mod tests {
    use super::*;

    const READ_REQUESTS: [&str; 7] = [
        ListProducts::NAME,
        GetProductById::NAME,
        LowStockProducts::NAME,
        SearchProducts::NAME,
        ListCategories::NAME,
        GetCategoryById::NAME,
        Dashboard::NAME,
    ];

    #[test]
    fn test_every_write_subject_is_mapped() {
        for subject in Subject::ALL {
            assert!(
                INVALIDATION_RULES.is_mapped(subject.as_str()),
                "{} has no invalidation rule",
                subject
            );
        }
    }

    #[test]
    fn test_every_prefix_names_a_read_request() {
        for subject in INVALIDATION_RULES.subjects() {
            for prefix in INVALIDATION_RULES.affected_prefixes(subject) {
                let name = prefix.trim_end_matches(':');
                assert!(
                    READ_REQUESTS.contains(&name),
                    "{} purges unknown prefix {}",
                    subject,
                    prefix
                );
            }
        }
    }

    #[test]
    fn test_product_prefixes() {
        assert_eq!(
            INVALIDATION_RULES.affected_prefixes("Product"),
            vec![
                "Dashboard:",
                "GetProductById:",
                "ListProducts:",
                "LowStockProducts:",
                "SearchProducts:"
            ]
        );
    }

    #[test]
    fn test_category_prefixes() {
        assert_eq!(
            INVALIDATION_RULES.affected_prefixes("Category"),
            vec!["Dashboard:", "GetCategoryById:", "ListCategories:"]
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(INVALIDATION_RULES.affected_prefixes("product").is_empty());
        assert!(INVALIDATION_RULES.affected_prefixes("Order").is_empty());
    }
}
