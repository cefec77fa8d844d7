//! Repeater: render a header template that expands a sequence of records.
//!
//! # Data Flow
//! ```text
//! header template
//!     @ItemTemplate@   → item template once per record (record properties)
//!     @FooterTemplate@ → footer template (ambient model)
//!     any other tag    → ambient model property
//! ```

use std::fmt::Write;

use crate::compose::context::Context;
use crate::compose::model::Model;
use crate::error::Result;

/// Header tag expanded to the item template once per record.
pub const ITEM_SECTION: &str = "ItemTemplate";
/// Header tag expanded to the footer template.
pub const FOOTER_SECTION: &str = "FooterTemplate";

/// The three templates a repeater renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeaterTemplates<'t> {
    pub header: &'t str,
    pub item: &'t str,
    pub footer: &'t str,
}

/// Called for tags with no value. Receives the tag, the current record
/// (`None` outside the item template) and the sink.
pub type UnmatchedRecordTag<'c> = &'c mut dyn FnMut(&str, Option<&Model>, &mut dyn Write) -> Result<()>;

/// Render `items` through the repeater templates into `out`.
pub fn repeat(
    ctx: &Context<'_>,
    out: &mut dyn Write,
    templates: RepeaterTemplates<'_>,
    items: &[Model],
    ambient: &Model,
    mut unmatched: Option<UnmatchedRecordTag<'_>>,
) -> Result<()> {
    ctx.parse_template(templates.header, out, |tag, out| {
        if tag == ITEM_SECTION {
            for item in items {
                ctx.parse_template(templates.item, out, |tag, out| {
                    write_or_report(item, Some(item), tag, out, &mut unmatched)
                })?;
            }
            Ok(())
        } else if tag == FOOTER_SECTION {
            ctx.parse_template(templates.footer, out, |tag, out| {
                write_or_report(ambient, None, tag, out, &mut unmatched)
            })
        } else {
            write_or_report(ambient, None, tag, out, &mut unmatched)
        }
    })
}

fn write_or_report(
    source: &Model,
    record: Option<&Model>,
    tag: &str,
    out: &mut dyn Write,
    unmatched: &mut Option<UnmatchedRecordTag<'_>>,
) -> Result<()> {
    match source.property(tag) {
        Some(value) => out.write_str(&value)?,
        None => {
            if let Some(callback) = unmatched.as_mut() {
                (*callback)(tag, record, out)?;
            }
        }
    }
    Ok(())
}
