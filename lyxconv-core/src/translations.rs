//! Translated strings for generated text
//!
//! Stages that synthesize content (the bibliography heading, for instance)
//! look their text up by key in the document language, falling back to
//! English and then to the key itself.

use once_cell::sync::Lazy;
use std::collections::HashMap;

type Table = HashMap<&'static str, &'static str>;

static TRANSLATIONS: Lazy<HashMap<&'static str, Table>> = Lazy::new(|| {
    let mut languages = HashMap::new();
    languages.insert("english", Table::from([("Bibliography", "Bibliography")]));
    languages.insert("spanish", Table::from([("Bibliography", "Bibliografía")]));
    languages.insert("german", Table::from([("Bibliography", "Literaturverzeichnis")]));
    languages.insert("french", Table::from([("Bibliography", "Bibliographie")]));
    languages.insert("italian", Table::from([("Bibliography", "Bibliografia")]));
    languages.insert("catalan", Table::from([("Bibliography", "Bibliografia")]));
    languages.insert("portuguese", Table::from([("Bibliography", "Bibliografia")]));
    languages.insert("dutch", Table::from([("Bibliography", "Bibliografie")]));
    languages
});

/// Text for `key` in `language`.
pub fn translate(language: &str, key: &str) -> String {
    let lookup = |language: &str| {
        TRANSLATIONS
            .get(language)
            .and_then(|table| table.get(key))
            .copied()
    };
    lookup(language)
        .or_else(|| lookup(base_language(language)))
        .or_else(|| lookup("english"))
        .unwrap_or(key)
        .to_string()
}

/// LyX spells regional variants as `ngerman`, `british`, `brazilian` and
/// so on; map the common ones onto their base language.
fn base_language(language: &str) -> &str {
    match language {
        "ngerman" | "austrian" | "naustrian" | "swissgerman" => "german",
        "american" | "british" | "canadian" | "australian" | "newzealand" => "english",
        "brazilian" | "brazil" => "portuguese",
        "canadien" | "acadian" => "french",
        other => other,
    }
}

/// ISO code for the `lang` attribute of the output.
pub fn language_code(language: &str) -> &'static str {
    match base_language(language) {
        "spanish" => "es",
        "german" => "de",
        "french" => "fr",
        "italian" => "it",
        "catalan" => "ca",
        "portuguese" => "pt",
        "dutch" => "nl",
        _ => "en",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_languages() {
        assert_eq!(translate("spanish", "Bibliography"), "Bibliografía");
        assert_eq!(translate("ngerman", "Bibliography"), "Literaturverzeichnis");
    }

    #[test]
    fn every_language_names_the_bibliography() {
        for (language, table) in TRANSLATIONS.iter() {
            let keys: Vec<_> = table.keys().copied().collect();
            assert_eq!(keys, vec!["Bibliography"], "{language}");
        }
    }

    #[test]
    fn fallbacks() {
        assert_eq!(translate("klingon", "Bibliography"), "Bibliography");
        assert_eq!(translate("english", "Unknown key"), "Unknown key");
    }

    #[test]
    fn codes() {
        assert_eq!(language_code("french"), "fr");
        assert_eq!(language_code("british"), "en");
        assert_eq!(language_code("klingon"), "en");
    }
}
