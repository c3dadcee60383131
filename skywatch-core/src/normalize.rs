//! Unit and locale normalization helpers, shared by the current-conditions
//! and forecast paths.

/// OpenWeatherMap sometimes returns temperatures in Kelvin even when asked
/// for deg C or deg F. Detect this and convert accordingly.
///
/// The threshold works for both C and F: 170 deg F is hotter than the
/// hottest place on earth, while any terrestrial Kelvin reading sits above it.
pub fn sanitize_temperature(value: f64, metric: bool) -> f32 {
    let mut value = value;
    if value > 170.0 {
        // K -> deg C
        value -= 273.15;
        if !metric {
            // deg C -> deg F
            value = value * 1.8 + 32.0;
        }
    }
    value as f32
}

/// Locale prefix to OpenWeatherMap language code. Entries are matched with
/// "starts with" semantics against a `language-COUNTRY` string; the Chinese
/// variants are the only ones that need the country part. Note the provider
/// still expects "sp" for Spanish, not "es".
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("bg-", "bg"),
    ("de-", "de"),
    ("es-", "sp"),
    ("fi-", "fi"),
    ("fr-", "fr"),
    ("it-", "it"),
    ("nl-", "nl"),
    ("pl-", "pl"),
    ("pt-", "pt"),
    ("ro-", "ro"),
    ("ru-", "ru"),
    ("se-", "se"),
    ("tr-", "tr"),
    ("uk-", "ua"),
    ("zh-CN", "zh_cn"),
    ("zh-TW", "zh_tw"),
];

/// Resolve a `language-COUNTRY` locale string to the provider's language
/// parameter. Unknown locales fall back to English.
pub fn resolve_language(locale: &str) -> &'static str {
    LANGUAGE_CODES
        .iter()
        .find(|(prefix, _)| locale.starts_with(*prefix))
        .map_or("en", |(_, code)| *code)
}
