use super::{RenderContext, TemplateEngine};
use crate::error::TemplateError;
use crate::payload::Payload;
use ::minijinja::value::{Rest, Value};
use ::minijinja::{Environment, Error, ErrorKind, UndefinedBehavior};
use std::sync::Arc;

/// [`TemplateEngine`] backed by MiniJinja.
///
/// Templates use Jinja syntax (`{{ page.title }}`, `{% if %}`, `{% for %}`,
/// `{{ value | filter }}`). Undefined variables render as empty strings
/// unless [`strict`](Self::strict) is enabled. Output is not auto-escaped
/// because `content` already holds HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaEngine {
    strict: bool,
}

impl MiniJinjaEngine {
    /// Create a lenient engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on undefined variables instead of rendering them empty.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn environment(&self, context: &RenderContext) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(if self.strict {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });

        let registers = Arc::new(context.registers.clone());
        for named in &context.filters {
            let named = named.clone();
            let registers = Arc::clone(&registers);
            let name = named.name().to_string();
            env.add_filter(name, move |value: Value, args: Rest<Value>| {
                apply_filter(&named, &value, &args, &registers)
            });
        }
        env
    }
}

fn apply_filter(
    filter: &super::NamedFilter,
    value: &Value,
    args: &[Value],
    registers: &Payload,
) -> Result<Value, Error> {
    let input = serde_json::to_value(value).map_err(bad_serialization)?;
    let args = args
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(bad_serialization)?;

    let output = filter.apply(&input, &args, registers).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("filter '{}' failed: {err}", filter.name()),
        )
    })?;
    Ok(Value::from_serialize(&output))
}

fn bad_serialization(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::BadSerialization, err.to_string())
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(
        &self,
        template: &str,
        payload: &Payload,
        context: &RenderContext,
    ) -> Result<String, TemplateError> {
        let env = self.environment(context);
        env.render_str(template, payload).map_err(|err| {
            let line = err.line();
            let error = TemplateError::with_source(err.to_string(), err);
            match line {
                Some(line) => error.at_line(line),
                None => error,
            }
        })
    }
}
