use kiln_binder::{Describer, Element};
use kiln_core::ElementMeta;

/// A command-line argument passed through to a tool.
///
/// `value` is a single argument, `line` a whitespace separated list of them.
#[derive(Debug, Default)]
pub struct Arg {
    meta: ElementMeta,
    value: Option<String>,
    line: Option<String>,
}

impl Arg {
    /// The arguments this element stands for.
    pub fn parts(&self) -> Vec<String> {
        match (&self.value, &self.line) {
            (Some(value), _) => vec![value.clone()],
            (None, Some(line)) => line.split_whitespace().map(str::to_string).collect(),
            (None, None) => Vec::new(),
        }
    }
}

impl Element for Arg {
    const NAME: &'static str = "arg";

    fn describe(d: &mut Describer<Self>) {
        d.attribute("value", "value", |a: &mut Self, v: String| a.value = Some(v));
        d.attribute("line", "line", |a: &mut Self, v: String| a.line = Some(v));
    }

    fn initialize(&mut self) -> Result<(), String> {
        match (&self.value, &self.line) {
            (Some(_), Some(_)) => Err("`value` and `line` cannot be combined".to_string()),
            (None, None) => Err("either `value` or `line` is required".to_string()),
            _ => Ok(()),
        }
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
