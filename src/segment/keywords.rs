//! Keyword filtering of segmented clauses.

/// Terms that mark a clause as lease-relevant.
pub const DEFAULT_LEASE_KEYWORDS: &[&str] = &[
    "rent",
    "payment",
    "deposit",
    "security",
    "tenant",
    "landlord",
    "lease",
    "termination",
    "maintenance",
    "repair",
    "utility",
    "utilities",
    "pet",
    "animal",
    "sublet",
    "sublease",
    "insurance",
    "default",
    "breach",
    "eviction",
];

/// Keep clauses that contain at least one keyword.
///
/// Matching is a case-insensitive substring test, so `"pet"` also matches
/// `"Carpet"`. `None` uses [`DEFAULT_LEASE_KEYWORDS`]. Order is preserved.
pub fn filter_by_keywords<T: AsRef<str>>(clauses: Vec<T>, keywords: Option<&[&str]>) -> Vec<T> {
    let keywords: Vec<String> = keywords
        .unwrap_or(DEFAULT_LEASE_KEYWORDS)
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    clauses
        .into_iter()
        .filter(|clause| {
            let lower = clause.as_ref().to_lowercase();
            keywords.iter().any(|k| lower.contains(k.as_str()))
        })
        .collect()
}
