//! Signature component identifiers and their resolution against a request.
//!
//! A component is either a *derived* component computed from request
//! metadata (`@method`, `@path`, ...) or a header field copied from the
//! request. Resolution yields one value for every component except
//! `@query-params`, which expands to one entry per query parameter.

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::error::{SignatureError, SignatureResult};
use crate::message::MessageView;

/// Components computed from request metadata rather than copied from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedComponent {
    /// `@method`: the request method.
    Method,
    /// `@authority`: the host the request was addressed to.
    Authority,
    /// `@scheme`: the URI scheme; requires an absolute request URI.
    Scheme,
    /// `@path`: the request path.
    Path,
    /// `@query`: `?` followed by the raw query string.
    Query,
    /// `@query-params`: one entry per query parameter.
    QueryParams,
    /// `@request-target`: path and query as received.
    RequestTarget,
    /// `@target-uri`: the full request URI; requires an absolute request URI.
    TargetUri,
}

impl DerivedComponent {
    /// The `@`-prefixed identifier of this component.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Method => "@method",
            Self::Authority => "@authority",
            Self::Scheme => "@scheme",
            Self::Path => "@path",
            Self::Query => "@query",
            Self::QueryParams => "@query-params",
            Self::RequestTarget => "@request-target",
            Self::TargetUri => "@target-uri",
        }
    }
}

impl FromStr for DerivedComponent {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@method" => Ok(Self::Method),
            "@authority" => Ok(Self::Authority),
            "@scheme" => Ok(Self::Scheme),
            "@path" => Ok(Self::Path),
            "@query" => Ok(Self::Query),
            "@query-params" => Ok(Self::QueryParams),
            "@request-target" => Ok(Self::RequestTarget),
            "@target-uri" => Ok(Self::TargetUri),
            other => Err(SignatureError::UnknownDerivedComponent(other.to_owned())),
        }
    }
}

/// A single entry of a signature's covered component list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    /// A derived component such as `@method`.
    Derived(DerivedComponent),
    /// A header field, matched case-insensitively. The name is kept as written
    /// so the signature base reproduces it verbatim.
    Field(String),
}

impl Component {
    /// Parse a component identifier.
    ///
    /// Identifiers starting with `@` must name a supported derived component;
    /// anything else must be a valid header field name.
    pub fn parse(identifier: &str) -> SignatureResult<Self> {
        if identifier.starts_with('@') {
            return identifier.parse().map(Self::Derived);
        }
        HeaderName::from_bytes(identifier.as_bytes()).map_err(|_| {
            SignatureError::InvalidSignatureInput(format!(
                "invalid header field name: {identifier:?}"
            ))
        })?;
        Ok(Self::Field(identifier.to_owned()))
    }

    /// The identifier as it appears in `Signature-Input` and the signature base.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Derived(derived) => derived.as_str(),
            Self::Field(name) => name,
        }
    }
}

impl FromStr for Component {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<DerivedComponent> for Component {
    fn from(derived: DerivedComponent) -> Self {
        Self::Derived(derived)
    }
}

/// A value produced by resolving a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentValue {
    /// The component's single canonical value.
    Single(String),
    /// One `@query-params` entry: the raw parameter name and value.
    QueryParam {
        /// Parameter name, undecoded.
        name: String,
        /// Parameter value, undecoded; empty when the parameter had none.
        value: String,
    },
}

/// A component paired with one of its resolved values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent<'c> {
    /// The component that was resolved.
    pub component: &'c Component,
    /// The value it resolved to.
    pub value: ComponentValue,
}

impl ResolvedComponent<'_> {
    /// Render this entry as a signature base line, including the trailing newline.
    ///
    /// ```text
    /// "@method" POST
    /// "@query-params";name="var2": 2
    /// ```
    #[must_use]
    pub fn to_base_line(&self) -> String {
        let name = self.component.name();
        match &self.value {
            ComponentValue::Single(value) => format!("\"{name}\" {value}\n"),
            ComponentValue::QueryParam { name: param, value } => {
                format!("\"{name}\";name=\"{param}\": {value}\n")
            }
        }
    }
}

/// Resolve a component against a request.
///
/// # Errors
///
/// - [`SignatureError::HeaderFieldNotFound`] when a header component is absent
/// - [`SignatureError::NonAbsoluteUri`] for `@scheme`/`@target-uri` on a relative URI
/// - [`SignatureError::InvalidHeaderValue`] when a header value is not text
pub fn resolve_component<'c>(
    message: &MessageView<'_>,
    component: &'c Component,
) -> SignatureResult<Vec<ResolvedComponent<'c>>> {
    let values = match component {
        Component::Derived(derived) => resolve_derived(message, *derived)?,
        Component::Field(name) => vec![ComponentValue::Single(resolve_field(message, name)?)],
    };

    Ok(values
        .into_iter()
        .map(|value| ResolvedComponent { component, value })
        .collect())
}

fn resolve_derived(
    message: &MessageView<'_>,
    derived: DerivedComponent,
) -> SignatureResult<Vec<ComponentValue>> {
    let single = match derived {
        DerivedComponent::Method => message.method.as_str().to_owned(),
        DerivedComponent::Authority => message
            .authority()
            .ok_or_else(|| SignatureError::HeaderFieldNotFound("host".to_owned()))?
            .to_owned(),
        DerivedComponent::Scheme => {
            require_absolute(message, derived)?;
            message.uri.scheme_str().unwrap_or_default().to_owned()
        }
        DerivedComponent::Path => message.uri.path().to_owned(),
        DerivedComponent::Query => format!("?{}", message.raw_query()),
        DerivedComponent::RequestTarget => message.request_target().to_owned(),
        DerivedComponent::TargetUri => {
            require_absolute(message, derived)?;
            message.uri.to_string()
        }
        DerivedComponent::QueryParams => return Ok(query_params(message.raw_query())),
    };
    Ok(vec![ComponentValue::Single(single)])
}

fn require_absolute(message: &MessageView<'_>, derived: DerivedComponent) -> SignatureResult<()> {
    if message.is_absolute() {
        Ok(())
    } else {
        Err(SignatureError::NonAbsoluteUri(format!(
            "{} requires an absolute request URI, got {}",
            derived.as_str(),
            message.uri
        )))
    }
}

/// Split a raw query string into `@query-params` entries.
///
/// Names and values are kept verbatim (no percent-decoding). A name that
/// occurs more than once contributes a single entry carrying the value of
/// its first occurrence. Empty parameters (`a=1&&b=2`) are skipped.
fn query_params(raw_query: &str) -> Vec<ComponentValue> {
    let mut entries: Vec<ComponentValue> = Vec::new();
    for param in raw_query.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = param.split_once('=').unwrap_or((param, ""));
        let seen = entries.iter().any(
            |entry| matches!(entry, ComponentValue::QueryParam { name: existing, .. } if existing == name),
        );
        if !seen {
            entries.push(ComponentValue::QueryParam {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
    }
    entries
}

/// Look up all values of a header field and fold them into one canonical value.
///
/// Multiple values are joined with `", "`; runs of whitespace are collapsed
/// to a single space and the result is trimmed.
fn resolve_field(message: &MessageView<'_>, name: &str) -> SignatureResult<String> {
    let header = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| SignatureError::HeaderFieldNotFound(name.to_owned()))?;

    let values = message
        .headers
        .get_all(&header)
        .iter()
        .map(|value| {
            value
                .to_str()
                .map_err(|_| SignatureError::InvalidHeaderValue(name.to_owned()))
        })
        .collect::<SignatureResult<Vec<&str>>>()?;

    if values.is_empty() {
        return Err(SignatureError::HeaderFieldNotFound(name.to_owned()));
    }

    Ok(collapse_whitespace(&values.join(", ")))
}

/// Collapse consecutive whitespace characters to a single space and trim both ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> http::Request<()> {
        http::Request::builder()
            .method("POST")
            .uri("/foo?var1=&var2=2")
            .header("host", "example.com")
            .header("date", "Tue, 20 Apr 2021 02:07:55 GMT")
            .header("content-type", "application/json")
            .header("content-length", "18")
            .body(())
            .unwrap()
    }

    fn resolve_single(request: &http::Request<()>, identifier: &str) -> SignatureResult<String> {
        let component = Component::parse(identifier)?;
        let resolved = resolve_component(&MessageView::from(request), &component)?;
        assert_eq!(resolved.len(), 1);
        match &resolved[0].value {
            ComponentValue::Single(value) => Ok(value.clone()),
            ComponentValue::QueryParam { .. } => panic!("unexpected query param"),
        }
    }

    #[test]
    fn test_should_resolve_basic_derived_components() {
        let request = test_request();
        assert_eq!(resolve_single(&request, "@method").unwrap(), "POST");
        assert_eq!(resolve_single(&request, "@path").unwrap(), "/foo");
        assert_eq!(resolve_single(&request, "@authority").unwrap(), "example.com");
        assert_eq!(
            resolve_single(&request, "@request-target").unwrap(),
            "/foo?var1=&var2=2"
        );
        assert_eq!(resolve_single(&request, "@query").unwrap(), "?var1=&var2=2");
    }

    #[test]
    fn test_should_resolve_empty_query_to_question_mark() {
        let request = http::Request::builder().uri("/foo").body(()).unwrap();
        assert_eq!(resolve_single(&request, "@query").unwrap(), "?");
    }

    #[test]
    fn test_should_expand_query_params_per_parameter() {
        let request = test_request();
        let component = Component::Derived(DerivedComponent::QueryParams);
        let resolved = resolve_component(&MessageView::from(&request), &component).unwrap();
        let lines: Vec<String> = resolved.iter().map(ResolvedComponent::to_base_line).collect();
        assert_eq!(
            lines,
            vec![
                "\"@query-params\";name=\"var1\": \n".to_owned(),
                "\"@query-params\";name=\"var2\": 2\n".to_owned(),
            ]
        );
    }

    #[test]
    fn test_should_keep_first_value_of_repeated_query_param() {
        let entries = query_params("a=1&&b&a=2");
        assert_eq!(
            entries,
            vec![
                ComponentValue::QueryParam {
                    name: "a".to_owned(),
                    value: "1".to_owned()
                },
                ComponentValue::QueryParam {
                    name: "b".to_owned(),
                    value: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_should_not_decode_query_param_values() {
        let entries = query_params("q=hello%20world");
        assert_eq!(
            entries,
            vec![ComponentValue::QueryParam {
                name: "q".to_owned(),
                value: "hello%20world".to_owned()
            }]
        );
    }

    #[test]
    fn test_should_require_absolute_uri_for_scheme_and_target_uri() {
        let request = test_request();
        let err = resolve_single(&request, "@scheme").unwrap_err();
        assert!(matches!(err, SignatureError::NonAbsoluteUri(_)));
        let err = resolve_single(&request, "@target-uri").unwrap_err();
        assert!(matches!(err, SignatureError::NonAbsoluteUri(_)));
    }

    #[test]
    fn test_should_resolve_scheme_and_target_uri_for_absolute_uri() {
        let request = http::Request::builder()
            .uri("https://example.com/foo?a=b")
            .body(())
            .unwrap();
        assert_eq!(resolve_single(&request, "@scheme").unwrap(), "https");
        assert_eq!(
            resolve_single(&request, "@target-uri").unwrap(),
            "https://example.com/foo?a=b"
        );
    }

    #[test]
    fn test_should_fold_multi_valued_header_fields() {
        let request = http::Request::builder()
            .uri("/")
            .header("x-multi", "a")
            .header("x-multi", "b")
            .body(())
            .unwrap();
        assert_eq!(resolve_single(&request, "x-multi").unwrap(), "a, b");
    }

    #[test]
    fn test_should_collapse_whitespace_in_header_values() {
        let request = http::Request::builder()
            .uri("/")
            .header("x-spaced", "  x   y  ")
            .body(())
            .unwrap();
        assert_eq!(resolve_single(&request, "x-spaced").unwrap(), "x y");
    }

    #[test]
    fn test_should_match_header_names_case_insensitively() {
        let request = test_request();
        assert_eq!(
            resolve_single(&request, "Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_should_reject_unknown_derived_component() {
        let err = Component::parse("@x-test").unwrap_err();
        assert!(matches!(err, SignatureError::UnknownDerivedComponent(name) if name == "@x-test"));
    }

    #[test]
    fn test_should_reject_missing_header_field() {
        let err = resolve_single(&test_request(), "x-test").unwrap_err();
        assert!(matches!(err, SignatureError::HeaderFieldNotFound(name) if name == "x-test"));
    }

    #[test]
    fn test_should_reject_invalid_header_field_name() {
        let err = Component::parse("bad name").unwrap_err();
        assert!(matches!(err, SignatureError::InvalidSignatureInput(_)));
    }
}
