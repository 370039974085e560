//! Identifier normalization.
//!
//! Turns names taken from a schema (operation IDs, path segments, parameter
//! names, document titles) into valid Python identifiers. All functions here
//! are pure and deterministic, and [`to_identifier`] is idempotent.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::naming::{function_name, to_identifier};
//! use apigen_core::HttpMethod;
//!
//! assert_eq!(to_identifier("getUserById"), "get_user_by_id");
//! assert_eq!(to_identifier("X-Request-ID"), "x_request_id");
//! assert_eq!(to_identifier("2fa"), "op_2fa");
//!
//! assert_eq!(
//!     function_name(None, HttpMethod::Get, "/users/{userId}/posts"),
//!     "get_users_by_user_id_posts"
//! );
//! ```

use apigen_core::{GeneratorConfig, HttpMethod};

/// Returned when a name contains nothing usable.
pub const FALLBACK_IDENTIFIER: &str = "unnamed_operation";

/// Prefix for identifiers that would otherwise start with a digit.
pub const DIGIT_PREFIX: &str = "op_";

/// Python keywords plus `self`, which generated methods already bind.
const RESERVED_WORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "self", "try", "while", "with", "yield",
];

/// Constants that cannot be used as class names.
const RESERVED_CLASS_NAMES: &[&str] = &["False", "None", "True"];

/// Normalizes an arbitrary string into a snake_case Python identifier.
///
/// 1. Characters other than ASCII letters, digits and `_` become `_`.
/// 2. An `_` is inserted before each uppercase letter that follows a
///    lowercase letter or digit, and the whole string is lowercased.
/// 3. Runs of `_` collapse to one; leading and trailing `_` are dropped.
/// 4. An empty result becomes [`FALLBACK_IDENTIFIER`]; a leading digit gets
///    [`DIGIT_PREFIX`]; a Python keyword or `self` gets a trailing `_`.
///
/// # Examples
///
/// ```
/// use apigen_codegen::naming::to_identifier;
///
/// assert_eq!(to_identifier("listPets"), "list_pets");
/// assert_eq!(to_identifier("HTTPServer2Go"), "httpserver2_go");
/// assert_eq!(to_identifier("__init__"), "init");
/// assert_eq!(to_identifier("class"), "class_");
/// assert_eq!(to_identifier("???"), "unnamed_operation");
///
/// let once = to_identifier("Some-Weird Name");
/// assert_eq!(to_identifier(&once), once);
/// ```
#[must_use]
pub fn to_identifier(raw: &str) -> String {
    let mut snake = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;

    for ch in raw.chars() {
        let ch = if ch.is_ascii_alphanumeric() { ch } else { '_' };
        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            snake.push('_');
        }
        snake.push(ch.to_ascii_lowercase());
        prev = Some(ch);
    }

    let mut collapsed = String::with_capacity(snake.len());
    for part in snake.split('_').filter(|p| !p.is_empty()) {
        if !collapsed.is_empty() {
            collapsed.push('_');
        }
        collapsed.push_str(part);
    }

    if collapsed.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }
    if collapsed.starts_with(|c: char| c.is_ascii_digit()) {
        collapsed.insert_str(0, DIGIT_PREFIX);
    }
    if is_reserved(&collapsed) {
        collapsed.push('_');
    }
    collapsed
}

/// Returns `true` if `name` cannot be used as a bare argument or method name.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Derives the method name for an operation.
///
/// Uses the normalized `operationId` when it contains at least one letter or
/// digit. Otherwise the name is synthesized from the lowercase method
/// followed by the path segments, where `{param}` becomes `by_<param>`.
///
/// # Examples
///
/// ```
/// use apigen_codegen::naming::function_name;
/// use apigen_core::HttpMethod;
///
/// assert_eq!(function_name(Some("listPets"), HttpMethod::Get, "/pets"), "list_pets");
/// assert_eq!(function_name(None, HttpMethod::Delete, "/pets/{petId}"), "delete_pets_by_pet_id");
/// assert_eq!(function_name(Some("  "), HttpMethod::Post, "/"), "post");
/// ```
#[must_use]
pub fn function_name(operation_id: Option<&str>, method: HttpMethod, template: &str) -> String {
    if let Some(id) = operation_id.filter(|id| id.chars().any(|c| c.is_ascii_alphanumeric())) {
        return to_identifier(id);
    }

    let mut raw = String::from(method.as_str());
    for segment in template.split('/').filter(|s| !s.is_empty()) {
        raw.push('_');
        for ch in segment.chars() {
            match ch {
                '{' => raw.push_str("_by_"),
                '}' => raw.push('_'),
                other => raw.push(other),
            }
        }
    }
    to_identifier(&raw)
}

/// Derives the client class name from the document title.
///
/// The title is split on every character that is not an ASCII letter, digit
/// or `_`; each word gets an uppercase first letter and the words are joined.
/// An empty result falls back to `config.fallback_class_name`; a result that
/// starts with a digit or `_`, or is a Python constant, is prefixed with
/// `config.class_name_prefix`.
///
/// # Examples
///
/// ```
/// use apigen_codegen::naming::class_name;
/// use apigen_core::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// assert_eq!(class_name(Some("Swagger Petstore"), &config), "SwaggerPetstore");
/// assert_eq!(class_name(Some("3D printing api"), &config), "Api3DPrintingApi");
/// assert_eq!(class_name(Some("!!!"), &config), "GeneratedApiApplication");
/// assert_eq!(class_name(None, &config), "GeneratedApiApplication");
/// ```
#[must_use]
pub fn class_name(title: Option<&str>, config: &GeneratorConfig) -> String {
    let joined: String = title
        .unwrap_or_default()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if joined.is_empty() {
        return config.fallback_class_name.clone();
    }
    if joined.starts_with(|c: char| c.is_ascii_digit() || c == '_')
        || RESERVED_CLASS_NAMES.contains(&joined.as_str())
    {
        return format!("{}{joined}", config.class_name_prefix);
    }
    joined
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}
