//! English singularization for table names.
//!
//! Only the last `_`-separated word is inflected, so `user_accounts`
//! becomes `user_account`.

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("oxen", "ox"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "data",
    "metadata",
    "jeans",
    "police",
];

/// Stems whose plural adds `es` to a word already ending in `s`.
const ES_AFTER_S: &[&str] = &["status", "alias", "bus", "virus", "campus", "census"];

/// Singular form of `name`, unless it is listed in `exclusions`.
pub fn singular(name: &str, exclusions: &[String]) -> String {
    if exclusions.iter().any(|excluded| excluded == name) {
        return name.to_string();
    }

    let split = name.rfind('_').map_or(0, |i| i + 1);
    let (prefix, word) = name.split_at(split);
    format!("{}{}", prefix, singular_word(word))
}

fn singular_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, single)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return with_leading_case(word, single);
    }
    if !word.is_ascii() {
        return word.to_string();
    }

    let keep = if ES_AFTER_S.iter().any(|stem| lower == format!("{}es", stem)) {
        word.len() - 2
    } else if lower.ends_with("ies") && lower.len() > 3 {
        return format!("{}{}", &word[..word.len() - 3], y_like(word));
    } else if lower.ends_with("sses")
        || lower.ends_with("xes")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
        || lower.ends_with("zzes")
    {
        word.len() - 2
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        word.len()
    } else if lower.ends_with('s') && lower.len() > 1 {
        word.len() - 1
    } else {
        word.len()
    };
    word[..keep].to_string()
}

/// `y` or `Y`, following the case of the replaced suffix.
fn y_like(word: &str) -> &'static str {
    if word.ends_with("IES") {
        "Y"
    } else {
        "y"
    }
}

fn with_leading_case(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(r)) if first.is_uppercase() => {
            r.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}
