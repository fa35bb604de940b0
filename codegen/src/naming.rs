//! Rust identifiers for schema names.

use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

/// Type names generated code refers to; declarations must not shadow them.
pub const RESERVED_TYPES: &[&str] = &["String", "Vec", "Option", "Box", "Self"];

pub fn type_name(local: &str) -> String {
    identifier(&local.to_pascal_case(), "Type")
}

pub fn field_name(local: &str) -> String {
    identifier(&local.to_snake_case(), "field")
}

pub fn module_name(local: &str) -> String {
    identifier(&local.to_snake_case(), "service")
}

pub fn const_name(local: &str) -> String {
    identifier(&local.to_shouty_snake_case(), "PORT")
}

/// `<Message>_<Part>`, with the message name's first letter upper-cased.
pub fn binding_name(message: &str, part: &str) -> String {
    let mut chars = message.chars();
    let message = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    identifier(&format!("{}_{}", sanitize(&message), sanitize(part)), "Binding")
}

/// Appends the smallest numeric suffix (from 2) that makes `name` unused.
pub fn unique<F: Fn(&str) -> bool>(name: String, taken: F) -> String {
    let mut candidate = name.clone();
    let mut suffix = 2;

    while taken(&candidate) {
        candidate = format!("{}{}", name, suffix);
        suffix += 1;
    }

    candidate
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn identifier(name: &str, fallback: &str) -> String {
    let name = sanitize(name);

    let name = if name.is_empty() {
        fallback.to_owned()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{}{}", fallback, name)
    } else {
        name
    };

    if KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}
