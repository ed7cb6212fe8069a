use std::collections::HashMap;
use std::sync::OnceLock;

/// Reference genre vocabulary, lower case and sorted.
/// Genres outside this list are accepted and stored lower-cased.
pub const GENRES: &[&str] = &[
    "antropologia",
    "arte",
    "biografia",
    "classico",
    "cucina",
    "documentario",
    "economia",
    "fantascienza",
    "fantasy",
    "filosofia",
    "fumetto",
    "giallo",
    "horror",
    "informatica",
    "narrativa",
    "poesia",
    "politica",
    "psicologia",
    "religione",
    "romanzo",
    "saggistica",
    "scienza",
    "sociologia",
    "storia",
    "thriller",
    "tutorial",
    "viaggi",
];

/// Alias entries mapping misspellings and variants to canonical genres.
/// Keys must be lowercase. Sorted alphabetically by key.
pub const ALIASES: &[(&str, &str)] = &[
    ("biografie", "biografia"),
    ("fantascenza", "fantascienza"),
    ("filosfia", "filosofia"),
    ("fumetti", "fumetto"),
    ("gialli", "giallo"),
    ("graphic novel", "fumetto"),
    ("noir", "giallo"),
    ("psicolgia", "psicologia"),
    ("romanzi", "romanzo"),
    ("saggio", "saggistica"),
    ("sci-fi", "fantascienza"),
    ("scienze", "scienza"),
    ("socilogia", "sociologia"),
    ("storico", "storia"),
    ("viaggio", "viaggi"),
];

fn alias_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| ALIASES.iter().copied().collect())
}

/// Canonical form of a genre: trimmed, lower-cased, alias applied.
/// Returns `None` for blank input.
pub fn canonical_genre(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    match alias_map().get(normalized.as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(normalized),
    }
}

pub fn is_known_genre(genre: &str) -> bool {
    canonical_genre(genre).is_some_and(|g| GENRES.contains(&g.as_str()))
}
