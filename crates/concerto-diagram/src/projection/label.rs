//! Edge labels.
//!
//! Property edges read as short English phrases: `has an address`,
//! `has many addresses`, `references a manager`, `references many orders`.
//! Inheritance edges read `is a <SuperType>`.

use concerto_diagram_core::metamodel::{Property, TypeIdentifier, short_name};

/// Prefixes that start with a vowel letter but a consonant sound.
const CONSONANT_SOUND_PREFIXES: &[&str] = &[
    "uni", "use", "usa", "usu", "uti", "ufo", "eu", "ewe", "one", "once",
];

/// Prefixes that start with a silent `h`.
const SILENT_H_PREFIXES: &[&str] = &["hour", "honest", "honor", "honour", "heir"];

/// Letters whose spoken name starts with a vowel sound, for acronyms.
const VOWEL_SOUND_LETTERS: &str = "AEFHILMNORSX";

/// Returns `a` or `an` for `word`.
pub fn indefinite_article(word: &str) -> &'static str {
    let Some(first) = word.chars().next() else {
        return "a";
    };

    // Acronyms are read letter by letter: "an ID", "a URL"
    let is_acronym = word.chars().count() > 1
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if is_acronym {
        return if VOWEL_SOUND_LETTERS.contains(first) {
            "an"
        } else {
            "a"
        };
    }

    let lower = word.to_ascii_lowercase();
    if SILENT_H_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return "an";
    }
    if CONSONANT_SOUND_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return "a";
    }
    match lower.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Label of the edge created for an object or relationship property.
pub fn property_label(property: &Property) -> String {
    let verb = if property.is_relationship() {
        "references"
    } else {
        "has"
    };
    let name = property.name();
    if property.is_array() {
        format!("{verb} many {name}")
    } else {
        format!("{verb} {} {name}", indefinite_article(name))
    }
}

/// Label of the edge created for a supertype.
pub fn super_type_label(super_type: &TypeIdentifier) -> String {
    format!("is a {}", short_name(super_type.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use concerto_diagram_core::metamodel::PropertyKind;

    fn object(name: &str) -> Property {
        Property::new(name, PropertyKind::Object(TypeIdentifier::local("Widget")))
    }

    fn relationship(name: &str) -> Property {
        Property::new(
            name,
            PropertyKind::Relationship(TypeIdentifier::local("Widget")),
        )
    }

    #[test]
    fn test_article_vowels_and_consonants() {
        assert_eq!(indefinite_article("widget"), "a");
        assert_eq!(indefinite_article("address"), "an");
        assert_eq!(indefinite_article("Engine"), "an");
        assert_eq!(indefinite_article("owner"), "an");
    }

    #[test]
    fn test_article_pronunciation_exceptions() {
        assert_eq!(indefinite_article("user"), "a");
        assert_eq!(indefinite_article("unit"), "a");
        assert_eq!(indefinite_article("european"), "a");
        assert_eq!(indefinite_article("hour"), "an");
        assert_eq!(indefinite_article("honorific"), "an");
        assert_eq!(indefinite_article("house"), "a");
    }

    #[test]
    fn test_article_acronyms() {
        assert_eq!(indefinite_article("ID"), "an");
        assert_eq!(indefinite_article("SKU"), "an");
        assert_eq!(indefinite_article("URL"), "a");
    }

    #[test]
    fn test_article_empty() {
        assert_eq!(indefinite_article(""), "a");
    }

    #[test]
    fn test_has_singular() {
        assert_eq!(property_label(&object("widget")), "has a widget");
        assert_eq!(property_label(&object("address")), "has an address");
    }

    #[test]
    fn test_has_many() {
        assert_eq!(
            property_label(&object("widgets").with_array(true)),
            "has many widgets"
        );
    }

    #[test]
    fn test_references() {
        assert_eq!(property_label(&relationship("widget")), "references a widget");
        assert_eq!(
            property_label(&relationship("orders").with_array(true)),
            "references many orders"
        );
        assert_eq!(
            property_label(&relationship("employer")),
            "references an employer"
        );
    }

    #[test]
    fn test_optional_does_not_change_label() {
        assert_eq!(
            property_label(&object("widget").with_optional(true)),
            "has a widget"
        );
    }

    #[test]
    fn test_super_type_label() {
        assert_eq!(
            super_type_label(&TypeIdentifier::qualified("org.acme", "Animal")),
            "is a Animal"
        );
    }
}
