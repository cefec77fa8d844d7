//! Model binding: fill a template's tags from a model's properties.

use std::fmt::Write;

use crate::compose::context::Context;
use crate::compose::model::Model;
use crate::error::Result;

/// Called for tags the model has no value for. Receives the tag and the sink.
pub type UnmatchedTag<'c> = &'c mut dyn FnMut(&str, &mut dyn Write) -> Result<()>;

impl Context<'_> {
    /// Scan a template file, writing the model's value for each tag.
    pub fn bind_model_to_template(
        &self,
        name: &str,
        out: &mut dyn Write,
        model: &Model,
        mut unmatched: Option<UnmatchedTag<'_>>,
    ) -> Result<()> {
        self.parse_template(name, out, |tag, out| {
            write_property(model, tag, out, &mut unmatched)
        })
    }

    /// Scan inline text, writing the model's value for each tag.
    pub fn bind_model_to_text(
        &self,
        text: &str,
        out: &mut dyn Write,
        model: &Model,
        mut unmatched: Option<UnmatchedTag<'_>>,
    ) -> Result<()> {
        self.parse_text(text, out, |tag, out| {
            write_property(model, tag, out, &mut unmatched)
        })
    }
}

fn write_property(
    model: &Model,
    tag: &str,
    out: &mut dyn Write,
    unmatched: &mut Option<UnmatchedTag<'_>>,
) -> Result<()> {
    match model.property(tag) {
        Some(value) => out.write_str(&value)?,
        None => {
            if let Some(callback) = unmatched.as_mut() {
                (*callback)(tag, out)?;
            }
        }
    }
    Ok(())
}
