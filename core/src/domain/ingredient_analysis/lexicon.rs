//! Static allergen reference data.
//!
//! Baseline names are screened in every analysis and reported verbatim. Aliases
//! imply their canonical allergen and are never reported themselves. Flour and
//! gluten both map to `wheat`, so they count as a single hit.

pub const COMMON_ALLERGENS: &[&str] = &[
    "milk",
    "eggs",
    "fish",
    "shellfish",
    "tree nuts",
    "peanuts",
    "wheat",
    "soybeans",
    "sesame",
    "mustard",
    "celery",
    "lupin",
    "mollusks",
    "sulfites",
    "corn",
];

pub const ALLERGEN_ALIASES: &[(&str, &[&str])] = &[
    (
        "milk",
        &["dairy", "lactose", "casein", "whey", "butter", "cream", "cheese"],
    ),
    ("eggs", &["egg white", "egg yolk", "albumin"]),
    ("wheat", &["flour", "gluten", "semolina", "durum"]),
    ("soy", &["soya", "lecithin"]),
    ("nuts", &["almond", "walnut", "pecan", "cashew", "pistachio"]),
];

/// Label phrases signalling possible cross-contact rather than a listed ingredient.
pub const PRECAUTIONARY_PHRASES: &[&str] = &[
    "may contain",
    "traces of",
    "facility",
    "shared equipment",
    "same line",
];

/// Every `(canonical, alias)` pair of the alias table.
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static str)> {
    ALLERGEN_ALIASES
        .iter()
        .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*canonical, *alias)))
}

/// Canonical allergen implied by `term` when `term` is a known alias.
pub fn canonical_for_alias(term: &str) -> Option<&'static str> {
    aliases()
        .find(|(_, alias)| *alias == term)
        .map(|(canonical, _)| canonical)
}

pub fn has_precautionary_phrase(lowercase_text: &str) -> bool {
    PRECAUTIONARY_PHRASES
        .iter()
        .any(|phrase| lowercase_text.contains(phrase))
}
