//! Country name to ISO 3166-1 alpha-2 code mapping

/// Code returned for countries the catalog does not know.
pub const UNKNOWN_COUNTRY_CODE: &str = "??";

static COUNTRY_CODES: &[(&str, &str)] = &[
    // MENA
    ("Saudi Arabia", "SA"),
    ("United Arab Emirates", "AE"),
    ("Kuwait", "KW"),
    ("Qatar", "QA"),
    ("Bahrain", "BH"),
    ("Oman", "OM"),
    ("Jordan", "JO"),
    ("Egypt", "EG"),
    ("Morocco", "MA"),
    // Europe
    ("United Kingdom", "GB"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("Spain", "ES"),
    ("Italy", "IT"),
    ("Netherlands", "NL"),
    ("Ireland", "IE"),
    ("Sweden", "SE"),
    // South Asia
    ("India", "IN"),
    ("Pakistan", "PK"),
    ("Bangladesh", "BD"),
    ("Sri Lanka", "LK"),
    ("Nepal", "NP"),
    // Global
    ("United States", "US"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("Singapore", "SG"),
    ("Japan", "JP"),
    ("Brazil", "BR"),
    ("South Africa", "ZA"),
];

/// ISO alpha-2 code for a known country, or [`UNKNOWN_COUNTRY_CODE`].
///
/// # Examples
///
/// ```
/// use merchant_catalog::country_code;
///
/// assert_eq!(country_code("Saudi Arabia"), "SA");
/// assert_eq!(country_code("Atlantis"), "??");
/// ```
pub fn country_code(country: &str) -> &'static str {
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, code)| *code)
        .unwrap_or(UNKNOWN_COUNTRY_CODE)
}

/// Every country the catalog knows a code for.
pub fn known_countries() -> impl Iterator<Item = &'static str> {
    COUNTRY_CODES.iter().map(|(name, _)| *name)
}
