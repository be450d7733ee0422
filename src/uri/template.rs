//! URI template expansion (RFC 6570, up to level 4)

use super::variables::{VarValue, Variables};
use crate::error::UriError;

/// Expands a templated href with caller-supplied variables.
pub trait UriTemplateProcessor: Send + Sync {
    fn process(&self, template: &str, variables: &Variables) -> Result<String, UriError>;
}

/// In-crate RFC 6570 expander.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc6570Processor;

impl UriTemplateProcessor for Rfc6570Processor {
    fn process(&self, template: &str, variables: &Variables) -> Result<String, UriError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                return Err(UriError::UnterminatedExpression {
                    template: template.to_string(),
                });
            };
            expand_expression(&after[..end], variables, template, &mut out)?;
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        tracing::trace!("expanded {} -> {}", template, out);
        Ok(out)
    }
}

/// Per-operator expansion behaviour (RFC 6570 appendix A).
struct Operator {
    first: &'static str,
    sep: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

impl Operator {
    fn parse(expression: &str) -> (Self, &str) {
        let op = |first, sep, named, if_empty, allow_reserved| Operator {
            first,
            sep,
            named,
            if_empty,
            allow_reserved,
        };

        let mut chars = expression.chars();
        let (operator, skip) = match chars.next() {
            Some('+') => (op("", ",", false, "", true), 1),
            Some('#') => (op("#", ",", false, "", true), 1),
            Some('.') => (op(".", ".", false, "", false), 1),
            Some('/') => (op("/", "/", false, "", false), 1),
            Some(';') => (op(";", ";", true, "", false), 1),
            Some('?') => (op("?", "&", true, "=", false), 1),
            Some('&') => (op("&", "&", true, "=", false), 1),
            _ => (op("", ",", false, "", false), 0),
        };
        (operator, &expression[skip..])
    }
}

struct VarSpec<'a> {
    name: &'a str,
    prefix: Option<usize>,
    explode: bool,
}

fn parse_varspec<'a>(spec: &'a str, template: &str) -> Result<VarSpec<'a>, UriError> {
    if let Some(name) = spec.strip_suffix('*') {
        return Ok(VarSpec {
            name,
            prefix: None,
            explode: true,
        });
    }

    match spec.split_once(':') {
        Some((name, modifier)) => {
            let prefix = Some(modifier)
                .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|m| m.parse::<usize>().ok())
                .filter(|n| (1..=9999).contains(n))
                .ok_or_else(|| UriError::InvalidPrefix {
                    template: template.to_string(),
                    modifier: modifier.to_string(),
                })?;
            Ok(VarSpec {
                name,
                prefix: Some(prefix),
                explode: false,
            })
        }
        None => Ok(VarSpec {
            name: spec,
            prefix: None,
            explode: false,
        }),
    }
}

fn expand_expression(
    expression: &str,
    variables: &Variables,
    template: &str,
    out: &mut String,
) -> Result<(), UriError> {
    let (op, body) = Operator::parse(expression);
    let mut first = true;

    for spec in body.split(',') {
        let spec = parse_varspec(spec.trim(), template)?;
        let Some(value) = variables.get(spec.name) else {
            continue;
        };
        if value.is_undefined() {
            continue;
        }

        out.push_str(if first { op.first } else { op.sep });
        first = false;

        match value {
            VarValue::String(s) => {
                if op.named {
                    out.push_str(spec.name);
                    out.push_str(if s.is_empty() { op.if_empty } else { "=" });
                }
                let s = match spec.prefix {
                    Some(n) => s.chars().take(n).collect::<String>(),
                    None => s.clone(),
                };
                out.push_str(&encode(&s, op.allow_reserved));
            }
            VarValue::List(items) if !spec.explode => {
                if op.named {
                    out.push_str(spec.name);
                    out.push('=');
                }
                let joined: Vec<String> =
                    items.iter().map(|i| encode(i, op.allow_reserved)).collect();
                out.push_str(&joined.join(","));
            }
            VarValue::Map(pairs) if !spec.explode => {
                if op.named {
                    out.push_str(spec.name);
                    out.push('=');
                }
                let joined: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{},{}",
                            encode(k, op.allow_reserved),
                            encode(v, op.allow_reserved)
                        )
                    })
                    .collect();
                out.push_str(&joined.join(","));
            }
            VarValue::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| named_pair(&op, spec.name, item))
                    .collect();
                out.push_str(&parts.join(op.sep));
            }
            VarValue::Map(pairs) => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| {
                        let key = encode(k, op.allow_reserved);
                        if v.is_empty() && op.named {
                            format!("{}{}", key, op.if_empty)
                        } else {
                            format!("{}={}", key, encode(v, op.allow_reserved))
                        }
                    })
                    .collect();
                out.push_str(&parts.join(op.sep));
            }
        }
    }

    Ok(())
}

/// One exploded list item; named operators repeat the variable name.
fn named_pair(op: &Operator, name: &str, item: &str) -> String {
    let value = encode(item, op.allow_reserved);
    if !op.named {
        value
    } else if item.is_empty() {
        format!("{}{}", name, op.if_empty)
    } else {
        format!("{}={}", name, value)
    }
}

fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return urlencoding::encode(value).into_owned();
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        let keep = c.is_ascii_alphanumeric()
            || "-._~:/?#[]@!$&'()*+,;=".contains(c)
            || (c == '%'
                && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit));
        if keep {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}
