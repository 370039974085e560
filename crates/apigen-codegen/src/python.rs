//! Python emitter for the code IR.
//!
//! Renders [`MethodDef`]s, statements, expressions and JSON literals as
//! Python 3 source. All string escaping in the generator happens here.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::python::{PythonEmitter, string_literal};
//! use apigen_codegen::ir::{Expr, MethodDef, Stmt};
//!
//! assert_eq!(string_literal("say \"hi\""), r#""say \"hi\"""#);
//!
//! let method = MethodDef {
//!     name: "ping".to_string(),
//!     params: vec![],
//!     var_kwargs: false,
//!     returns: None,
//!     docstring: None,
//!     body: vec![Stmt::Return(Expr::str("pong"))],
//! };
//! let source = PythonEmitter::new().method(&method, 0);
//! assert_eq!(source, "def ping(self):\n    return \"pong\"");
//! ```

use crate::ir::{Expr, MethodDef, Param, Stmt};
use serde_json::Value;
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Containers with more entries than this are split over several lines.
const INLINE_LIMIT: usize = 2;

/// Renders IR nodes as Python source.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter;

impl PythonEmitter {
    /// Creates an emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders a method whose `def` line sits at indentation `level`.
    ///
    /// The result has no trailing newline.
    #[must_use]
    pub fn method(&self, method: &MethodDef, level: usize) -> String {
        let pad = INDENT.repeat(level);
        let mut out = String::new();

        let mut params = vec!["self".to_string()];
        params.extend(method.params.iter().map(|p| self.param(p, level + 1)));
        if method.var_kwargs {
            params.push(format!("**{}", crate::ir::KWARGS));
        }

        let _ = write!(out, "{pad}def {}({})", method.name, params.join(", "));
        if let Some(returns) = &method.returns {
            let _ = write!(out, " -> {returns}");
        }
        out.push(':');

        let mut lines = Vec::new();
        if let Some(doc) = &method.docstring {
            lines.push(docstring(doc, level + 1));
        }
        lines.extend(method.body.iter().map(|s| self.stmt(s, level + 1)));
        if lines.is_empty() {
            lines.push(format!("{pad}{INDENT}pass"));
        }

        for line in lines {
            out.push('\n');
            out.push_str(&line);
        }
        out
    }

    fn param(&self, param: &Param, level: usize) -> String {
        let mut out = param.name.clone();
        if let Some(annotation) = &param.annotation {
            let _ = write!(out, ": {annotation}");
        }
        if let Some(default) = &param.default {
            let sep = if param.annotation.is_some() { " = " } else { "=" };
            let _ = write!(out, "{sep}{}", self.expr(default, level));
        }
        out
    }

    /// Renders one statement (and any nested block) at indentation `level`.
    #[must_use]
    pub fn stmt(&self, stmt: &Stmt, level: usize) -> String {
        let pad = INDENT.repeat(level);
        match stmt {
            Stmt::Assign { target, value } => {
                format!("{pad}{target} = {}", self.expr(value, level))
            }
            Stmt::SetItem { target, key, value } => format!(
                "{pad}{target}[{}] = {}",
                self.expr(key, level),
                self.expr(value, level)
            ),
            Stmt::If { test, body } => {
                let mut out = format!("{pad}if {}:", self.expr(test, level));
                if body.is_empty() {
                    let _ = write!(out, "\n{pad}{INDENT}pass");
                }
                for inner in body {
                    out.push('\n');
                    out.push_str(&self.stmt(inner, level + 1));
                }
                out
            }
            Stmt::Raise(error) => format!("{pad}raise {}", self.expr(error, level)),
            Stmt::Warn(message) => format!(
                "{pad}warnings.warn({}, stacklevel=2)",
                self.expr(message, level)
            ),
            Stmt::Expr(value) => format!("{pad}{}", self.expr(value, level)),
            Stmt::Return(value) => format!("{pad}return {}", self.expr(value, level)),
        }
    }

    /// Renders an expression; `level` is the indentation of the line it
    /// starts on, used when the expression spans several lines.
    #[must_use]
    pub fn expr(&self, expr: &Expr, level: usize) -> String {
        match expr {
            Expr::Name(name) => name.clone(),
            Expr::Attr(value, attr) => format!("{}.{attr}", self.operand(value, level)),
            Expr::Str(value) => string_literal(value),
            Expr::NoneLit => "None".to_string(),
            Expr::Literal(value) => literal(value, level),
            Expr::Call {
                func,
                args,
                kwargs,
                splat,
            } => {
                let mut parts: Vec<String> = args.iter().map(|a| self.expr(a, level)).collect();
                parts.extend(
                    kwargs
                        .iter()
                        .map(|(k, v)| format!("{k}={}", self.expr(v, level))),
                );
                if let Some(name) = splat {
                    parts.push(format!("**{name}"));
                }
                format!("{}({})", self.operand(func, level), parts.join(", "))
            }
            Expr::Dict(pairs) => self.dict(pairs, level),
            Expr::PresentOnly(pairs) => self.present_only(pairs, level),
            Expr::JoinPairs { separator, mapping } => format!(
                "{}.join(f\"{{k}}={{v}}\" for k, v in {}.items())",
                string_literal(separator),
                self.operand(mapping, level)
            ),
            Expr::Add(left, right) => format!(
                "{} + {}",
                self.operand(left, level),
                self.operand(right, level)
            ),
            Expr::IfElse { body, test, orelse } => {
                // comparisons and `not` bind tighter than a conditional
                let condition = match test.as_ref() {
                    Expr::IfElse { .. } => self.operand(test, level),
                    other => self.expr(other, level),
                };
                format!(
                    "{} if {condition} else {}",
                    self.operand(body, level),
                    self.operand(orelse, level)
                )
            }
            Expr::Not(value) => format!("not {}", self.operand(value, level)),
            Expr::IsNone(value) => format!("{} is None", self.operand(value, level)),
            Expr::IsNotNone(value) => format!("{} is not None", self.operand(value, level)),
        }
    }

    /// Parenthesizes operator expressions used as operands.
    fn operand(&self, expr: &Expr, level: usize) -> String {
        let rendered = self.expr(expr, level);
        match expr {
            Expr::Add(..)
            | Expr::IfElse { .. }
            | Expr::Not(_)
            | Expr::IsNone(_)
            | Expr::IsNotNone(_) => {
                format!("({rendered})")
            }
            _ => rendered,
        }
    }

    fn dict(&self, pairs: &[(Expr, Expr)], level: usize) -> String {
        if pairs.is_empty() {
            return "{}".to_string();
        }
        let entries: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("{}: {}", self.expr(k, level + 1), self.expr(v, level + 1)))
            .collect();
        if pairs.len() <= INLINE_LIMIT {
            return format!("{{{}}}", entries.join(", "));
        }
        let inner = INDENT.repeat(level + 1);
        let pad = INDENT.repeat(level);
        format!(
            "{{\n{inner}{}\n{pad}}}",
            entries.join(&format!(",\n{inner}"))
        )
    }

    fn present_only(&self, pairs: &[(Expr, Expr)], level: usize) -> String {
        if pairs.is_empty() {
            return "{}".to_string();
        }
        let tuples: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("({}, {})", self.expr(k, level + 2), self.expr(v, level + 2)))
            .collect();
        if pairs.len() <= INLINE_LIMIT {
            return format!(
                "{{k: v for k, v in [{}] if v is not None}}",
                tuples.join(", ")
            );
        }
        let pad = INDENT.repeat(level);
        let one = INDENT.repeat(level + 1);
        let two = INDENT.repeat(level + 2);
        format!(
            "{{\n{one}k: v\n{one}for k, v in [\n{two}{}\n{one}]\n{one}if v is not None\n{pad}}}",
            tuples.join(&format!(",\n{two}"))
        )
    }
}

/// Renders a double-quoted Python string literal.
///
/// Backslashes, double quotes and control characters are escaped; other
/// characters are kept as-is (generated modules are UTF-8).
///
/// # Examples
///
/// ```
/// use apigen_codegen::python::string_literal;
///
/// assert_eq!(string_literal("a\\b"), r#""a\\b""#);
/// assert_eq!(string_literal("line\nnext"), r#""line\nnext""#);
/// assert_eq!(string_literal("caf\u{e9}"), "\"caf\u{e9}\"");
/// ```
#[must_use]
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a JSON value as a Python literal (`null` → `None`,
/// `true` → `True`, `false` → `False`).
///
/// Non-empty arrays and objects are laid out one entry per line, indented
/// relative to `level`.
///
/// # Examples
///
/// ```
/// use apigen_codegen::python::literal;
/// use serde_json::json;
///
/// assert_eq!(literal(&json!([true, null, 1.5]), 0), "[\n    True,\n    None,\n    1.5\n]");
/// assert_eq!(literal(&json!({}), 0), "{}");
/// ```
#[must_use]
pub fn literal(value: &Value, level: usize) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_literal(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(items) => {
            let inner = INDENT.repeat(level + 1);
            let entries: Vec<String> = items
                .iter()
                .map(|item| format!("{inner}{}", literal(item, level + 1)))
                .collect();
            format!("[\n{}\n{}]", entries.join(",\n"), INDENT.repeat(level))
        }
        Value::Object(map) => {
            let inner = INDENT.repeat(level + 1);
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{inner}{}: {}", string_literal(k), literal(v, level + 1)))
                .collect();
            format!("{{\n{}\n{}}}", entries.join(",\n"), INDENT.repeat(level))
        }
    }
}

/// Renders a triple-quoted docstring at indentation `level`.
///
/// Backslashes and embedded `"""` are escaped so the text always closes
/// where it should.
///
/// # Examples
///
/// ```
/// use apigen_codegen::python::docstring;
///
/// assert_eq!(docstring("One line.", 1), "    \"\"\"One line.\"\"\"");
/// assert_eq!(docstring(r"C:\path", 0), r#""""C:\\path""""#);
/// ```
#[must_use]
pub fn docstring(text: &str, level: usize) -> String {
    let pad = INDENT.repeat(level);
    let mut escaped = text.trim().replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    let unescaped_quote_at = escaped.strip_suffix('"').and_then(|body| {
        let backslashes = body.chars().rev().take_while(|&c| c == '\\').count();
        (backslashes % 2 == 0).then_some(body.len())
    });
    if let Some(index) = unescaped_quote_at {
        escaped.insert(index, '\\');
    }

    let mut lines = escaped.lines();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();
    if rest.is_empty() {
        return format!("{pad}\"\"\"{first}\"\"\"");
    }

    let mut out = format!("{pad}\"\"\"{first}");
    for line in rest {
        out.push('\n');
        let line = line.trim_end();
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    let _ = write!(out, "\n{pad}\"\"\"");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{PyType, Stmt};
    use serde_json::json;

    #[test]
    fn test_string_literal_control_chars() {
        assert_eq!(string_literal("\u{7}"), "\"\\u0007\"");
        assert_eq!(string_literal("tab\there"), "\"tab\\there\"");
    }

    #[test]
    fn test_literal_nested() {
        let value = json!({"name": "x", "flags": [false], "extra": null});
        let rendered = literal(&value, 1);
        assert_eq!(
            rendered,
            "{\n        \"name\": \"x\",\n        \"flags\": [\n            False\n        ],\n        \"extra\": None\n    }"
        );
    }

    #[test]
    fn test_docstring_multiline() {
        let doc = docstring("Summary.\n\nArgs:\n    a: first", 2);
        assert_eq!(
            doc,
            "        \"\"\"Summary.\n\n        Args:\n            a: first\n        \"\"\""
        );
    }

    #[test]
    fn test_docstring_escapes_triple_quotes() {
        let doc = docstring("Say \"\"\"hi\"\"\"", 0);
        assert!(doc.starts_with("\"\"\"Say \\\"\\\"\\\"hi"));
        assert!(doc.ends_with("\\\"\"\"\""));
        assert_eq!(doc.matches("\"\"\"").count(), 2);
    }

    #[test]
    fn test_method_signature() {
        let method = MethodDef {
            name: "get_pet".to_string(),
            params: vec![
                Param::required("pet_id", PyType::Str),
                Param::optional("limit", PyType::Int),
            ],
            var_kwargs: false,
            returns: Some(PyType::Any),
            docstring: Some("Fetch a pet.".to_string()),
            body: vec![Stmt::Return(Expr::name("pet_id"))],
        };
        let source = PythonEmitter::new().method(&method, 1);
        assert_eq!(
            source,
            "    def get_pet(self, pet_id: str, limit: Optional[int] = None) -> Any:\n        \"\"\"Fetch a pet.\"\"\"\n        return pet_id"
        );
    }

    #[test]
    fn test_method_without_body_passes() {
        let method = MethodDef {
            name: "noop".to_string(),
            params: vec![],
            var_kwargs: true,
            returns: None,
            docstring: None,
            body: vec![],
        };
        assert_eq!(
            PythonEmitter::new().method(&method, 0),
            "def noop(self, **kwargs):\n    pass"
        );
    }

    #[test]
    fn test_if_raise() {
        let stmt = Stmt::If {
            test: Expr::IsNone(Box::new(Expr::name("user_id"))),
            body: vec![Stmt::Raise(Expr::name("MissingRequiredParameter").call_kw(
                vec![],
                vec![("argument".to_string(), Expr::str("user_id"))],
            ))],
        };
        assert_eq!(
            PythonEmitter::new().stmt(&stmt, 0),
            "if user_id is None:\n    raise MissingRequiredParameter(argument=\"user_id\")"
        );
    }

    #[test]
    fn test_present_only_inline_and_block() {
        let emitter = PythonEmitter::new();
        let two = Expr::PresentOnly(vec![
            (Expr::str("a"), Expr::name("a")),
            (Expr::str("b"), Expr::name("b")),
        ]);
        assert_eq!(
            emitter.expr(&two, 0),
            "{k: v for k, v in [(\"a\", a), (\"b\", b)] if v is not None}"
        );

        let three = Expr::PresentOnly(vec![
            (Expr::str("a"), Expr::name("a")),
            (Expr::str("b"), Expr::name("b")),
            (Expr::str("c"), Expr::name("c")),
        ]);
        assert_eq!(
            emitter.expr(&three, 1),
            "{\n        k: v\n        for k, v in [\n            (\"a\", a),\n            (\"b\", b),\n            (\"c\", c)\n        ]\n        if v is not None\n    }"
        );
        assert_eq!(emitter.expr(&Expr::PresentOnly(vec![]), 0), "{}");
    }

    #[test]
    fn test_operator_operands_are_parenthesized() {
        let emitter = PythonEmitter::new();
        let expr = Expr::Attr(
            Box::new(Expr::IsNotNone(Box::new(Expr::name("a")))),
            "x".to_string(),
        );
        assert_eq!(emitter.expr(&expr, 0), "(a is not None).x");
    }

    #[test]
    fn test_conditional_expression() {
        let expr = Expr::IfElse {
            body: Box::new(Expr::name("url")),
            test: Box::new(Expr::IsNotNone(Box::new(Expr::name("url")))),
            orelse: Box::new(Expr::str("https://x.test")),
        };
        assert_eq!(
            PythonEmitter::new().expr(&expr, 0),
            "url if url is not None else \"https://x.test\""
        );
    }

    #[test]
    fn test_join_pairs() {
        let expr = Expr::JoinPairs {
            separator: "; ".to_string(),
            mapping: Box::new(Expr::name("_cookies")),
        };
        assert_eq!(
            PythonEmitter::new().expr(&expr, 0),
            "\"; \".join(f\"{k}={v}\" for k, v in _cookies.items())"
        );
    }
}
