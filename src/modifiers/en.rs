/// Basic English modifiers: indefinite article, capitalisation, replace.
use crate::core::grammar::Grammar;

/// Register every modifier in this pack under its conventional name.
pub fn register(grammar: &mut Grammar) {
    grammar.register_modifier("a", indefinite_article);
    grammar.register_modifier("capitalize", capitalize);
    grammar.register_modifier("replace", replace);
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `owl` → `an owl`, `cat` → `a cat`.
pub fn indefinite_article(value: &str, _params: &[String]) -> String {
    match value.chars().next() {
        None => String::new(),
        Some(c) if is_vowel(c) => format!("an {}", value),
        Some(_) => format!("a {}", value),
    }
}

/// Uppercase the first character.
pub fn capitalize(value: &str, _params: &[String]) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `replace(search, replacement)` — replace every occurrence of `search`.
pub fn replace(value: &str, params: &[String]) -> String {
    match params {
        [search, replacement, ..] if !search.is_empty() => value.replace(search.as_str(), replacement),
        _ => value.to_string(),
    }
}
