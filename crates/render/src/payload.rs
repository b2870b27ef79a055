//! Template payloads and the deep merge used between layout steps.

use serde_json::Value as JsonValue;

/// Data handed to the templating engine.
pub type Payload = serde_json::Map<String, JsonValue>;

/// Payload key holding the rendered output of the previous step.
pub const CONTENT_KEY: &str = "content";
/// Payload key holding the metadata of the layout being applied.
pub const PAGE_KEY: &str = "page";
/// Payload key holding the document's content type.
pub const CONTENT_TYPE_KEY: &str = "content_type";

/// Returns `base` deep-merged with `overlay`.
///
/// Keys found on only one side are kept. Keys on both sides merge
/// recursively when both values are mappings; otherwise the `overlay`
/// value wins.
///
/// ```
/// use quire_render::payload::deep_merge;
/// use serde_json::json;
///
/// let base = json!({"site": {"title": "Blog", "url": "x"}, "page": {"a": 1}});
/// let overlay = json!({"site": {"title": "Other"}, "page": 2});
/// let merged = deep_merge(base.as_object().unwrap(), overlay.as_object().unwrap());
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"site": {"title": "Other", "url": "x"}, "page": 2})
/// );
/// ```
pub fn deep_merge(base: &Payload, overlay: &Payload) -> Payload {
    let mut merged = base.clone();
    deep_merge_into(&mut merged, overlay.clone());
    merged
}

/// In-place form of [`deep_merge`]: merges `overlay` into `target`.
pub fn deep_merge_into(target: &mut Payload, overlay: Payload) {
    for (key, value) in overlay {
        let incoming = match value {
            JsonValue::Object(incoming) => incoming,
            other => {
                target.insert(key, other);
                continue;
            }
        };

        if let Some(JsonValue::Object(existing)) = target.get_mut(&key) {
            deep_merge_into(existing, incoming);
            continue;
        }
        target.insert(key, JsonValue::Object(incoming));
    }
}
