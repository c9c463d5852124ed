// Construct label normalization
//
// Callers write labels such as "Array/List" or "Custom Function/Method".
// Each language maps them (case-insensitively) onto its own construct keys.

use crate::language::Language;

const PYTHON: &[(&str, &str)] = &[
    ("custom function/method", "function"),
    ("function", "function"),
    ("loop", "loop"),
    ("for loop", "for loop"),
    ("while loop", "while loop"),
    ("if statement", "if statement"),
    ("if-else statement", "if statement"),
    ("array/list", "list"),
    ("list", "list"),
    ("dictionary", "dictionary"),
    ("class", "class"),
    ("recursion", "recursion"),
    ("try-except", "try-except"),
    ("with statement", "with statement"),
];

const JAVA: &[(&str, &str)] = &[
    ("custom function/method", "method"),
    ("method", "method"),
    ("function", "method"),
    ("loop", "loop"),
    ("for loop", "for loop"),
    ("while loop", "while loop"),
    ("do-while loop", "do-while loop"),
    ("if statement", "if statement"),
    ("if-else statement", "if statement"),
    ("array/list", "array"),
    ("array", "array"),
    ("arraylist", "ArrayList"),
    ("hashmap", "HashMap"),
    ("class", "class"),
    ("recursion", "recursion"),
    ("try-catch", "try-catch"),
];

const CPP: &[(&str, &str)] = &[
    ("custom function/method", "function"),
    ("function", "function"),
    ("loop", "loop"),
    ("for loop", "for loop"),
    ("while loop", "while loop"),
    ("do-while loop", "do-while loop"),
    ("if statement", "if statement"),
    ("if-else statement", "if statement"),
    ("array/list", "array"),
    ("array", "array"),
    ("vector", "vector"),
    ("map", "map"),
    ("class", "class"),
    ("struct", "struct"),
    ("pointer", "pointer"),
    ("recursion", "recursion"),
    ("try-catch", "try-catch"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Python => PYTHON,
        Language::Java => JAVA,
        Language::Cpp => CPP,
    }
}

/// Canonical construct key for a label; unknown labels pass through unchanged
pub fn normalize_construct(label: &str, language: Language) -> String {
    let wanted = label.trim().to_lowercase();
    table(language)
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|(_, key)| (*key).to_string())
        .unwrap_or_else(|| label.to_string())
}
