//! Strong domain types for apigen.
//!
//! Closed vocabularies of the OpenAPI documents the generator consumes are
//! modelled as enums rather than strings, so the compiler cannot confuse a
//! parameter location with an HTTP method or a media type.
//!
//! # Examples
//!
//! ```
//! use apigen_core::{HttpMethod, ParameterLocation, TypeTag};
//!
//! let method: HttpMethod = "GET".parse().unwrap();
//! assert_eq!(method.as_str(), "get");
//!
//! let location: ParameterLocation = "path".parse().unwrap();
//! assert_eq!(location, ParameterLocation::Path);
//!
//! assert_eq!(TypeTag::from_openapi("integer"), Some(TypeTag::Integer));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// All methods in the order OpenAPI path items list them.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Returns the lowercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Returns `true` if the API-wrapper base exposes a primitive for this verb.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::HttpMethod;
    ///
    /// assert!(HttpMethod::Patch.is_dispatchable());
    /// assert!(!HttpMethod::Head.is_dispatchable());
    /// ```
    #[must_use]
    pub const fn is_dispatchable(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Post | Self::Put | Self::Patch | Self::Delete
        )
    }

    /// Returns `true` if requests with this verb carry a body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| crate::Error::InvalidArgument(format!("unknown HTTP method: '{s}'")))
    }
}

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Substituted into the URL template
    Path,
    /// Appended to the query string
    Query,
    /// Sent as a request header
    Header,
    /// Sent inside the `Cookie` header
    Cookie,
}

impl ParameterLocation {
    /// Returns the lowercase location name used by OpenAPI's `in` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            _ => Err(crate::Error::InvalidArgument(format!(
                "unknown parameter location: '{s}' (expected: path, query, header, or cookie)"
            ))),
        }
    }
}

/// Semantic type tag resolved from an OpenAPI schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl TypeTag {
    /// Maps an OpenAPI `type` keyword to a tag.
    ///
    /// Returns `None` for `null`, which is never a concrete type. Any other
    /// unknown keyword resolves to `String`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::TypeTag;
    ///
    /// assert_eq!(TypeTag::from_openapi("boolean"), Some(TypeTag::Boolean));
    /// assert_eq!(TypeTag::from_openapi("date"), Some(TypeTag::String));
    /// assert_eq!(TypeTag::from_openapi("null"), None);
    /// ```
    #[must_use]
    pub fn from_openapi(keyword: &str) -> Option<Self> {
        match keyword {
            "null" => None,
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => Some(Self::String),
        }
    }

    /// Returns the JSON-Schema keyword for the tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// `application/json` and `+json` vendor types: sent as structured data
    Json,
    /// `application/x-www-form-urlencoded`: sent as a flat key/value map
    FormUrlEncoded,
    /// `multipart/form-data`: sent as form fields
    Multipart,
    /// Anything else: sent as raw content
    Raw,
}

impl MediaKind {
    /// Classifies a media type string, ignoring parameters such as `charset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apigen_core::MediaKind;
    ///
    /// assert_eq!(MediaKind::classify("application/json; charset=utf-8"), MediaKind::Json);
    /// assert_eq!(MediaKind::classify("application/vnd.api+json"), MediaKind::Json);
    /// assert_eq!(MediaKind::classify("text/plain"), MediaKind::Raw);
    /// ```
    #[must_use]
    pub fn classify(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            "multipart/form-data" => Self::Multipart,
            other if other.ends_with("+json") => Self::Json,
            _ => Self::Raw,
        }
    }
}
