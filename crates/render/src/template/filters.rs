use super::NamedFilter;
use crate::payload::Payload;
use quire_core::BoxError;
use serde_json::Value as JsonValue;

/// The filters every [`RenderContext::with_default_filters`](super::RenderContext::with_default_filters) carries.
///
/// - `xml_escape`: escape `&`, `<`, `>`, `"` and `'`.
/// - `number_of_words`: count whitespace separated words.
/// - `array_to_sentence_string`: `["a", "b", "c"]` to `a, b, and c`;
///   an optional argument replaces the connector word.
/// - `jsonify`: serialize the value as JSON.
pub fn default_filters() -> Vec<NamedFilter> {
    vec![
        NamedFilter::new("xml_escape", xml_escape),
        NamedFilter::new("number_of_words", number_of_words),
        NamedFilter::new("array_to_sentence_string", array_to_sentence_string),
        NamedFilter::new("jsonify", jsonify),
    ]
}

fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn xml_escape(input: &JsonValue, _: &[JsonValue], _: &Payload) -> Result<JsonValue, BoxError> {
    let text = text_of(input);
    Ok(JsonValue::String(
        html_escape::encode_quoted_attribute(&text).into_owned(),
    ))
}

fn number_of_words(input: &JsonValue, _: &[JsonValue], _: &Payload) -> Result<JsonValue, BoxError> {
    Ok(JsonValue::from(text_of(input).split_whitespace().count()))
}

fn array_to_sentence_string(
    input: &JsonValue,
    args: &[JsonValue],
    _: &Payload,
) -> Result<JsonValue, BoxError> {
    let JsonValue::Array(items) = input else {
        return Err(format!("array_to_sentence_string expects an array, got {input}").into());
    };
    let connector = args.first().map(text_of).unwrap_or_else(|| "and".to_string());
    let words: Vec<String> = items.iter().map(text_of).collect();

    let sentence = match words.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} {connector} {second}"),
        [init @ .., last] => format!("{}, {connector} {last}", init.join(", ")),
    };
    Ok(JsonValue::String(sentence))
}

fn jsonify(input: &JsonValue, _: &[JsonValue], _: &Payload) -> Result<JsonValue, BoxError> {
    Ok(JsonValue::String(serde_json::to_string(input)?))
}
