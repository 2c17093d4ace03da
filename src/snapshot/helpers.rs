use serde_json::Value;

pub fn truncate(s: &str, n: usize) -> String {
    if s.len() <= n {
        return s.to_string();
    }
    let mut cut = n;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = String::with_capacity(cut + 16);
    out.push_str(&s[..cut]);
    out.push_str(" …[trunc]");
    out
}

/// A non-empty string, the way the page's own scripts test fields for presence.
pub fn truthy_str(v: Option<&Value>) -> bool {
    matches!(v, Some(Value::String(s)) if !s.is_empty())
}

/// Present and not `null`, `false`, `0` or `""`.
pub fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Iterates `queries[i].state.data` of a dehydrated query cache.
pub fn query_cache_data(v: &Value) -> impl Iterator<Item = &Value> {
    v.get("queries")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|q| q.get("state").and_then(|s| s.get("data")))
        .filter(|d| !d.is_null())
}

/// Looks for the `props.pageProps` envelope anywhere in a parsed blob.
pub fn find_page_props_in_value(v: &Value) -> Option<&Value> {
    match v {
        Value::Object(map) => {
            if let Some(pp) = map.get("props").and_then(|p| p.get("pageProps"))
                && pp.is_object()
            {
                return Some(pp);
            }
            map.values().find_map(find_page_props_in_value)
        }
        Value::Array(arr) => arr.iter().find_map(find_page_props_in_value),
        _ => None,
    }
}
