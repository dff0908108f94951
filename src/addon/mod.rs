//! Export add-ons for the supported output formats.
//!
//! Each add-on is a pure consumer of the ordering traversal: it pulls nodes
//! one at a time and emits format-specific output to a writer. Export is
//! all-or-nothing; an unsupported order is rejected before any byte is
//! written.

pub mod html;
pub mod pdf;
pub mod text;
pub mod xml;

use crate::model::TaskModel;
use crate::order::{ExportFilter, ExportOrder};
use anyhow::Result;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddonError {
    #[error("export order {order:?} is not supported by the {addon} add-on")]
    UnsupportedOrder {
        addon: &'static str,
        order: ExportOrder,
    },
}

/// One export add-on per output format.
pub trait Addon {
    fn name(&self) -> &'static str;

    /// Orders the add-on can honor. `FormatSpecific` never appears here; it
    /// resolves through [`Addon::default_order`] instead.
    fn supported_orders(&self) -> &'static [ExportOrder];

    /// The add-on's preferred order, used when `FormatSpecific` is requested.
    fn default_order(&self) -> ExportOrder;

    /// Walks the traversal once and writes the full document to `out`.
    fn export(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
        out: &mut dyn Write,
    ) -> Result<()>;

    /// Resolves the requested order against the supported set. Called before
    /// producing output; a rejected request leaves the writer untouched.
    fn resolve_order(&self, requested: ExportOrder) -> Result<ExportOrder, AddonError> {
        if requested == ExportOrder::FormatSpecific {
            return Ok(self.default_order());
        }
        if self.supported_orders().contains(&requested) {
            Ok(requested)
        } else {
            Err(AddonError::UnsupportedOrder {
                addon: self.name(),
                order: requested,
            })
        }
    }
}

/// Minimal escaping for text embedded in HTML markup; used by the HTML and
/// PDF add-ons.
pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The single piece of cross-node state an add-on keeps: whether the section
/// opened by the last marker has produced an action yet.
///
/// A section counts as empty only when the next marker starts at the same or
/// a shallower depth; a deeper sub-marker continues the section.
#[derive(Debug, Default)]
pub struct Section {
    last_depth: Option<u8>,
    has_actions: bool,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a marker at `depth`. Returns `true` when the section being
    /// closed produced no actions, so the caller can insert a placeholder
    /// before the new heading.
    pub fn enter_marker(&mut self, depth: u8) -> bool {
        let close_empty = matches!(self.last_depth, Some(d) if depth <= d) && !self.has_actions;
        self.last_depth = Some(depth);
        self.has_actions = false;
        close_empty
    }

    pub fn enter_action(&mut self) {
        self.has_actions = true;
    }

    /// Closes the final section at end of traversal. Returns `true` when it
    /// produced no actions.
    pub fn finish(&mut self) -> bool {
        let close_empty = self.last_depth.is_some() && !self.has_actions;
        self.last_depth = None;
        self.has_actions = false;
        close_empty
    }
}
