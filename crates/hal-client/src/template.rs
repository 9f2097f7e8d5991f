//! # URI Templates
//!
//! Expands a link's `href` into a concrete URI.
//!
//! - An untemplated link expands to its `href` unchanged; parameters are ignored.
//! - A templated link without parameters fails with
//!   [`HalError::TemplateParametersRequired`] before anything touches the network.
//! - Otherwise the href is expanded as an RFC 6570 template. Parameter names are
//!   matched to template variables ignoring ASCII case, so `OrderRef` fills
//!   `{orderRef}`.
//!
//! Expansion covers every operator (`+ # . / ; ? &`) and both modifiers (`:n`
//! prefix, `*` explode) for string and list values. Literal text between
//! expressions is encoded like a `+` expansion: reserved characters and existing
//! `%XX` triplets stay as they are, anything else is percent-encoded.

use crate::error::HalError;
use crate::model::Link;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

/// Everything except the RFC 3986 unreserved characters.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Everything except unreserved and reserved characters; used by `+`, `#` and literals.
const UNRESERVED_OR_RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// A value bound to a template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    String(String),
    List(Vec<String>),
}

impl TemplateValue {
    /// Undefined values are skipped during expansion.
    fn is_defined(&self) -> bool {
        match self {
            TemplateValue::String(_) => true,
            TemplateValue::List(items) => !items.is_empty(),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::String(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::String(value)
    }
}

impl From<&String> for TemplateValue {
    fn from(value: &String) -> Self {
        TemplateValue::String(value.clone())
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::String(value.to_string())
    }
}

macro_rules! template_value_from_number {
    ($($ty:ty),*) => {
        $(impl From<$ty> for TemplateValue {
            fn from(value: $ty) -> Self {
                TemplateValue::String(value.to_string())
            }
        })*
    };
}

template_value_from_number!(i32, i64, u32, u64, usize);

impl<S: Into<String>> From<Vec<S>> for TemplateValue {
    fn from(values: Vec<S>) -> Self {
        TemplateValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Named values for template expansion, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, TemplateValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TemplateValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Looks a variable up ignoring ASCII case; the first matching entry wins.
    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds parameters from anything that serializes to a JSON object.
    ///
    /// Scalars become strings, arrays of scalars become lists and nulls are
    /// left undefined.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, HalError> {
        let value = serde_json::to_value(value).map_err(|e| HalError::EncodeFailed(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(HalError::EncodeFailed(
                "template parameters must serialize to an object".to_string(),
            ));
        };

        let mut parameters = Parameters::new();
        for (name, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let items = items.iter().filter_map(scalar_to_string).collect::<Vec<_>>();
                    parameters.insert(name, TemplateValue::List(items));
                }
                other => {
                    if let Some(text) = scalar_to_string(&other) {
                        parameters.insert(name, TemplateValue::String(text));
                    }
                }
            }
        }
        Ok(parameters)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Parameters
where
    K: Into<String>,
    V: Into<TemplateValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<TemplateValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Parameters::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }
        parameters
    }
}

/// Produces the concrete URI for `link`.
pub fn expand(link: &Link, parameters: Option<&Parameters>) -> Result<String, HalError> {
    if !link.templated {
        return Ok(link.href.clone());
    }
    let parameters = parameters.ok_or_else(|| HalError::TemplateParametersRequired {
        href: link.href.clone(),
    })?;
    expand_template(&link.href, parameters)
}

/// Expands an RFC 6570 template against `parameters`.
pub fn expand_template(template: &str, parameters: &Parameters) -> Result<String, HalError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        if rest[..open].contains('}') {
            return Err(malformed(template, "unmatched '}'"));
        }
        output.push_str(&encode(&rest[..open], true));
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| malformed(template, "unclosed expression"))?;
        expand_expression(template, &after[..close], parameters, &mut output)?;
        rest = &after[close + 1..];
    }
    if rest.contains('}') {
        return Err(malformed(template, "unmatched '}'"));
    }
    output.push_str(&encode(rest, true));
    Ok(output)
}

fn malformed(template: &str, reason: &str) -> HalError {
    HalError::MalformedTemplate {
        href: template.to_string(),
        reason: reason.to_string(),
    }
}

/// How one operator renders its variables (RFC 6570 appendix A).
struct Operator {
    first: &'static str,
    separator: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

impl Operator {
    fn parse(expression: &str) -> (Self, &str) {
        let operator = |first, separator, named, if_empty, allow_reserved| Operator {
            first,
            separator,
            named,
            if_empty,
            allow_reserved,
        };
        match expression.chars().next() {
            Some('+') => (operator("", ",", false, "", true), &expression[1..]),
            Some('#') => (operator("#", ",", false, "", true), &expression[1..]),
            Some('.') => (operator(".", ".", false, "", false), &expression[1..]),
            Some('/') => (operator("/", "/", false, "", false), &expression[1..]),
            Some(';') => (operator(";", ";", true, "", false), &expression[1..]),
            Some('?') => (operator("?", "&", true, "=", false), &expression[1..]),
            Some('&') => (operator("&", "&", true, "=", false), &expression[1..]),
            _ => (operator("", ",", false, "", false), expression),
        }
    }
}

enum Modifier {
    None,
    Prefix(usize),
    Explode,
}

fn parse_varspec<'a>(template: &str, spec: &'a str) -> Result<(&'a str, Modifier), HalError> {
    let (name, modifier) = if let Some(name) = spec.strip_suffix('*') {
        (name, Modifier::Explode)
    } else if let Some((name, length)) = spec.split_once(':') {
        if length.is_empty() || !length.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(template, "prefix length is not a number"));
        }
        if length.starts_with('0') || length.len() > 4 {
            return Err(malformed(template, "prefix length out of range"));
        }
        let length: usize = length
            .parse()
            .map_err(|_| malformed(template, "prefix length is not a number"))?;
        (name, Modifier::Prefix(length))
    } else {
        (spec, Modifier::None)
    };

    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '%');
    if !valid {
        return Err(malformed(template, "invalid variable name"));
    }
    Ok((name, modifier))
}

fn expand_expression(
    template: &str,
    expression: &str,
    parameters: &Parameters,
    output: &mut String,
) -> Result<(), HalError> {
    if expression.starts_with(['=', ',', '!', '@', '|']) {
        return Err(malformed(template, "reserved operator"));
    }
    let (operator, variables) = Operator::parse(expression);
    let mut first = true;

    for spec in variables.split(',') {
        let (name, modifier) = parse_varspec(template, spec)?;
        let Some(value) = parameters.get(name).filter(|value| value.is_defined()) else {
            continue;
        };

        output.push_str(if first { operator.first } else { operator.separator });
        first = false;

        match value {
            TemplateValue::String(text) => {
                let text = match modifier {
                    Modifier::Prefix(length) => text.chars().take(length).collect::<String>(),
                    _ => text.clone(),
                };
                push_named(output, &operator, name, &text);
            }
            TemplateValue::List(items) => match modifier {
                Modifier::Explode => {
                    for (index, item) in items.iter().enumerate() {
                        if index > 0 {
                            output.push_str(operator.separator);
                        }
                        push_named(output, &operator, name, item);
                    }
                }
                _ => {
                    if operator.named {
                        output.push_str(name);
                        output.push('=');
                    }
                    let joined = items
                        .iter()
                        .map(|item| encode(item, operator.allow_reserved))
                        .collect::<Vec<_>>()
                        .join(",");
                    output.push_str(&joined);
                }
            },
        }
    }
    Ok(())
}

fn push_named(output: &mut String, operator: &Operator, name: &str, value: &str) {
    if operator.named {
        output.push_str(name);
        if value.is_empty() {
            output.push_str(operator.if_empty);
            return;
        }
        output.push('=');
    }
    output.push_str(&encode(value, operator.allow_reserved));
}

fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return utf8_percent_encode(value, UNRESERVED).to_string();
    }

    // Existing pct-encoded triplets pass through; a stray '%' becomes %25.
    let bytes = value.as_bytes();
    let mut encoded = String::with_capacity(bytes.len());
    let mut segment_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let pct_triplet = bytes[index] == b'%'
            && index + 2 < bytes.len()
            && bytes[index + 1].is_ascii_hexdigit()
            && bytes[index + 2].is_ascii_hexdigit();
        if pct_triplet {
            encoded.extend(utf8_percent_encode(&value[segment_start..index], UNRESERVED_OR_RESERVED));
            encoded.push_str(&value[index..index + 3]);
            index += 3;
            segment_start = index;
        } else {
            index += 1;
        }
    }
    encoded.extend(utf8_percent_encode(&value[segment_start..], UNRESERVED_OR_RESERVED));
    encoded
}
