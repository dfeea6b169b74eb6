//! `{name}` placeholder rendering for URLs and header templates.

use serde_json::Value;

use crate::error::ServiceError;
use crate::input::Params;

/// Render `base_url + path` against the query values.
///
/// Each query entry either fills the matching `{key}` placeholder or is
/// appended as a query parameter, in insertion order. Values are
/// percent-encoded, keys are not. The first appended parameter starts the
/// query string with `?` unless the URL already carries one.
pub fn build_url(base_url: &str, path: &str, query: &Params) -> Result<String, ServiceError> {
    let mut url = format!("{base_url}{path}");

    for (key, value) in query {
        let encoded = urlencoding::encode(&stringify(value)).into_owned();
        let token = format!("{{{key}}}");
        if url.contains(&token) {
            url = url.replace(&token, &encoded);
        } else {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(key);
            url.push('=');
            url.push_str(&encoded);
        }
    }

    if let Some((_, _, name)) = placeholders(&url).next() {
        return Err(ServiceError::UnresolvedPlaceholder {
            placeholder: name.to_string(),
            url: url.clone(),
        });
    }
    Ok(url)
}

/// Replace every `{key}` in `template` with the stringified value of `key`.
///
/// Values are inserted verbatim (no percent-encoding). A key missing from
/// `values` is an error.
pub fn render_template(template: &str, values: &Params) -> Result<String, ServiceError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for (start, end, key) in placeholders(template) {
        let value = values
            .get(key)
            .ok_or_else(|| ServiceError::MissingTemplateValue {
                key: key.to_string(),
                template: template.to_string(),
            })?;
        rendered.push_str(&template[last..start]);
        rendered.push_str(&stringify(value));
        last = end;
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

/// Text form of a parameter value.
///
/// Strings are used as is, arrays are comma-joined, everything else uses its
/// compact JSON form (`5`, `true`, `null`, `{"a":1}`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Yields `(start, end, name)` for each `{name}` token. `end` is exclusive.
fn placeholders(template: &str) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
    let mut offset = 0;
    std::iter::from_fn(move || {
        while let Some(rel) = template[offset..].find('{') {
            let start = offset + rel;
            let rest = &template[start + 1..];
            let len = rest.find('}')?;
            let name = &rest[..len];
            if is_placeholder_name(name) {
                offset = start + len + 2;
                return Some((start, offset, name));
            }
            offset = start + 1;
        }
        None
    })
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn substitutes_placeholder_and_appends_the_rest() {
        let url = build_url(
            "http://localhost:3000",
            "/api/x/{id}",
            &params(json!({"id": 5, "foo": "a b"})),
        )
        .unwrap();
        assert_eq!(url, "http://localhost:3000/api/x/5?foo=a%20b");
    }

    #[test]
    fn empty_query_leaves_seed_unchanged() {
        let url = build_url("http://h", "/api/customers", &Params::new()).unwrap();
        assert_eq!(url, "http://h/api/customers");
    }

    #[test]
    fn existing_query_string_continues_with_ampersand() {
        let url = build_url(
            "http://h",
            "/search?scope=all",
            &params(json!({"q": "x", "limit": 10})),
        )
        .unwrap();
        assert_eq!(url, "http://h/search?scope=all&q=x&limit=10");
    }

    #[test]
    fn appended_parameters_keep_insertion_order() {
        let url = build_url("http://h", "/p", &params(json!({"z": 1, "a": 2, "m": 3}))).unwrap();
        assert_eq!(url, "http://h/p?z=1&a=2&m=3");
    }

    #[test]
    fn placeholder_values_are_percent_encoded() {
        let url = build_url("http://h", "/files/{name}", &params(json!({"name": "a/b c"}))).unwrap();
        assert_eq!(url, "http://h/files/a%2Fb%20c");
    }

    #[test]
    fn unresolved_placeholder_is_an_error() {
        let err = build_url("http://h", "/api/{org}/{id}", &params(json!({"id": 1}))).unwrap_err();
        match err {
            ServiceError::UnresolvedPlaceholder { placeholder, url } => {
                assert_eq!(placeholder, "org");
                assert_eq!(url, "http://h/api/{org}/1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn braces_without_a_name_are_not_placeholders() {
        let url = build_url("http://h", "/odd/{}/{a b}", &Params::new()).unwrap();
        assert_eq!(url, "http://h/odd/{}/{a b}");
    }

    #[test]
    fn renders_prefer_template() {
        let rendered =
            render_template("example={example}, code={code}", &params(json!({"example": "vip", "code": 200})))
                .unwrap();
        assert_eq!(rendered, "example=vip, code=200");
    }

    #[test]
    fn prefer_template_values_are_not_encoded() {
        let rendered = render_template("example={e}", &params(json!({"e": "a b"}))).unwrap();
        assert_eq!(rendered, "example=a b");
    }

    #[test]
    fn missing_template_value_is_an_error() {
        let err = render_template("example={example}", &Params::new()).unwrap_err();
        assert!(matches!(err, ServiceError::MissingTemplateValue { key, .. } if key == "example"));
    }

    #[test]
    fn stringify_follows_text_forms() {
        assert_eq!(stringify(&json!("s")), "s");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!([1, "b", true])), "1,b,true");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
