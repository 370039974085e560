//! Intermediate representation of generated Python code.
//!
//! The compiler lowers each operation into a [`MethodDef`] made of
//! [`Stmt`] and [`Expr`] nodes; the [`python`](crate::python) emitter is the
//! only place that turns these into text. Nothing in the IR holds
//! pre-rendered source, so quoting and escaping happen exactly once.

use apigen_core::TypeTag;
use serde_json::Value;
use std::fmt;

/// A Python type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PyType {
    /// `Any`
    Any,
    /// `str`
    Str,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `List[T]`
    List(Box<PyType>),
    /// `Dict[str, Any]`
    Dict,
    /// `Optional[T]`
    Optional(Box<PyType>),
    /// `List[Dict[str, Any]]`, the manifest shape
    ToolList,
    /// Any other name, e.g. an imported class or `None`
    Named(String),
}

impl PyType {
    /// Builds the annotation for a resolved tag and optional item tag.
    ///
    /// An undetermined tag (`None`) becomes `Any`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_codegen::ir::PyType;
    /// use apigen_core::TypeTag;
    ///
    /// assert_eq!(PyType::from_tags(Some(TypeTag::Integer), None).to_string(), "int");
    /// assert_eq!(
    ///     PyType::from_tags(Some(TypeTag::Array), Some(TypeTag::String)).to_string(),
    ///     "List[str]"
    /// );
    /// assert_eq!(PyType::from_tags(None, None).optional().to_string(), "Optional[Any]");
    /// ```
    #[must_use]
    pub fn from_tags(tag: Option<TypeTag>, item: Option<TypeTag>) -> Self {
        match tag {
            None => Self::Any,
            Some(TypeTag::String) => Self::Str,
            Some(TypeTag::Integer) => Self::Int,
            Some(TypeTag::Number) => Self::Float,
            Some(TypeTag::Boolean) => Self::Bool,
            Some(TypeTag::Object) => Self::Dict,
            Some(TypeTag::Array) => {
                let element = match item {
                    Some(TypeTag::Array) | None => Self::Any,
                    other => Self::from_tags(other, None),
                };
                Self::List(Box::new(element))
            }
        }
    }

    /// Wraps the type in `Optional[...]`.
    #[must_use]
    pub fn optional(self) -> Self {
        match self {
            Self::Optional(_) => self,
            other => Self::Optional(Box::new(other)),
        }
    }
}

impl fmt::Display for PyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Str => f.write_str("str"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::List(inner) => write!(f, "List[{inner}]"),
            Self::Dict => f.write_str("Dict[str, Any]"),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::ToolList => f.write_str("List[Dict[str, Any]]"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare name such as `user_id` or `self`
    Name(String),
    /// Attribute access: `value.attr`
    Attr(Box<Expr>, String),
    /// A string literal
    Str(String),
    /// `None`
    NoneLit,
    /// A JSON value rendered as a Python literal
    Literal(Value),
    /// A call with positional and keyword arguments
    Call {
        /// Callee
        func: Box<Expr>,
        /// Positional arguments
        args: Vec<Expr>,
        /// Keyword arguments, in order
        kwargs: Vec<(String, Expr)>,
        /// Name forwarded as `**name` after the keyword arguments
        splat: Option<String>,
    },
    /// A dict display: `{k: v, ...}`
    Dict(Vec<(Expr, Expr)>),
    /// A dict keeping only the pairs whose value is not `None`:
    /// `{k: v for k, v in [(k1, v1), ...] if v is not None}`
    PresentOnly(Vec<(Expr, Expr)>),
    /// `"<separator>".join(f"{k}={v}" for k, v in <mapping>.items())`
    JoinPairs {
        /// Separator between pairs
        separator: String,
        /// The mapping to join
        mapping: Box<Expr>,
    },
    /// `left + right`
    Add(Box<Expr>, Box<Expr>),
    /// `body if test else orelse`
    IfElse {
        /// Value when the test holds
        body: Box<Expr>,
        /// Condition
        test: Box<Expr>,
        /// Value otherwise
        orelse: Box<Expr>,
    },
    /// `not value`
    Not(Box<Expr>),
    /// `value is None`
    IsNone(Box<Expr>),
    /// `value is not None`
    IsNotNone(Box<Expr>),
}

impl Expr {
    /// `Expr::Name` from anything string-like.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// `Expr::Str` from anything string-like.
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// `self.<attr>`
    #[must_use]
    pub fn self_attr(attr: impl Into<String>) -> Self {
        Self::Attr(Box::new(Self::name("self")), attr.into())
    }

    /// `<self>.<attr>`
    #[must_use]
    pub fn attr(self, attr: impl Into<String>) -> Self {
        Self::Attr(Box::new(self), attr.into())
    }

    /// Call with positional arguments only.
    #[must_use]
    pub fn call(self, args: Vec<Self>) -> Self {
        Self::Call {
            func: Box::new(self),
            args,
            kwargs: Vec::new(),
            splat: None,
        }
    }

    /// Call with positional and keyword arguments.
    #[must_use]
    pub fn call_kw(self, args: Vec<Self>, kwargs: Vec<(String, Self)>) -> Self {
        Self::Call {
            func: Box::new(self),
            args,
            kwargs,
            splat: None,
        }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `target = value`
    Assign {
        /// Variable name
        target: String,
        /// Assigned value
        value: Expr,
    },
    /// `target[key] = value`
    SetItem {
        /// Mapping variable name
        target: String,
        /// Key expression
        key: Expr,
        /// Assigned value
        value: Expr,
    },
    /// `if test:` followed by an indented block
    If {
        /// Condition
        test: Expr,
        /// Block executed when the condition holds
        body: Vec<Stmt>,
    },
    /// `raise <error>`
    Raise(Expr),
    /// `warnings.warn(<message>)`
    Warn(Expr),
    /// A bare expression statement
    Expr(Expr),
    /// `return <value>`
    Return(Expr),
}

/// A parameter in a method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Type annotation; omitted when `None`
    pub annotation: Option<PyType>,
    /// Default value; required parameters have none
    pub default: Option<Expr>,
}

impl Param {
    /// A parameter with no default.
    #[must_use]
    pub fn required(name: impl Into<String>, annotation: PyType) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation),
            default: None,
        }
    }

    /// An `Optional[...]` parameter defaulting to `None`.
    #[must_use]
    pub fn optional(name: impl Into<String>, annotation: PyType) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.optional()),
            default: Some(Expr::NoneLit),
        }
    }
}

/// Keyword-argument catch-all such as `**kwargs`.
pub const KWARGS: &str = "kwargs";

/// A method of the generated class. `self` is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Parameters after `self`
    pub params: Vec<Param>,
    /// Whether the signature ends in `**kwargs`
    pub var_kwargs: bool,
    /// Return annotation
    pub returns: Option<PyType>,
    /// Docstring text (unescaped)
    pub docstring: Option<String>,
    /// Method body
    pub body: Vec<Stmt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_py_type_display() {
        assert_eq!(PyType::from_tags(Some(TypeTag::Number), None).to_string(), "float");
        assert_eq!(PyType::from_tags(Some(TypeTag::Boolean), None).to_string(), "bool");
        assert_eq!(
            PyType::from_tags(Some(TypeTag::Object), None).to_string(),
            "Dict[str, Any]"
        );
        assert_eq!(
            PyType::from_tags(Some(TypeTag::Array), None).to_string(),
            "List[Any]"
        );
        assert_eq!(
            PyType::from_tags(Some(TypeTag::Array), Some(TypeTag::Object)).to_string(),
            "List[Dict[str, Any]]"
        );
        assert_eq!(PyType::ToolList.to_string(), "List[Dict[str, Any]]");
    }

    #[test]
    fn test_optional_does_not_nest() {
        let once = PyType::Str.optional();
        assert_eq!(once.clone().optional(), once);
        assert_eq!(once.to_string(), "Optional[str]");
    }

    #[test]
    fn test_param_constructors() {
        let required = Param::required("user_id", PyType::Str);
        assert!(required.default.is_none());
        let optional = Param::optional("limit", PyType::Int);
        assert_eq!(optional.annotation, Some(PyType::Optional(Box::new(PyType::Int))));
        assert_eq!(optional.default, Some(Expr::NoneLit));
    }
}
