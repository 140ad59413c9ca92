// src/entries/whitelist.rs

//! Storefront page templates that may have their own entrypoint.

/// Name prefixes of the page templates the storefront renders.
///
/// A `templates/` entry only becomes an entrypoint when its name starts with
/// one of these, so alternate templates like `product-recommendations` or
/// `page.contact` are picked up while helpers like `robots` are not.
pub const VALID_TEMPLATES: &[&str] = &[
    "404",
    "article",
    "blog",
    "cart",
    "collection",
    "account",
    "activate_account",
    "addresses",
    "login",
    "order",
    "register",
    "reset_password",
    "gift_card",
    "index",
    "list-collections",
    "page",
    "password",
    "product",
    "search",
];

pub fn is_valid_template(name: &str) -> bool {
    VALID_TEMPLATES
        .iter()
        .any(|template| name.starts_with(template))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_accepts_alternate_templates() {
        assert!(is_valid_template("product"));
        assert!(is_valid_template("product-recommendations"));
        assert!(is_valid_template("page.contact"));
        assert!(is_valid_template("reset_password"));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(!is_valid_template("robots"));
        assert!(!is_valid_template("theme"));
        assert!(!is_valid_template(""));
    }
}
