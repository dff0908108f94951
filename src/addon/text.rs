//! Plain-text structured dump.
//!
//! Record format (kept byte-exact for compatibility with existing
//! consumers): each record starts with a `@PROJECT:`, `@LIST:` or
//! `@ACTION:` line, continues with an `@ID:` or `@STATUS:` line, then
//! `@DESCRIPTION:` followed by the description wrapped between `~~`
//! markers, and ends with one blank line.

use crate::addon::{Addon, Section};
use crate::model::{Action, Folder, TaskModel};
use crate::order::{ExportFilter, ExportNode, ExportOrder, OrderingIter};
use anyhow::Result;
use std::io::Write;

const SUPPORTED: &[ExportOrder] = &[
    ExportOrder::Actions,
    ExportOrder::FoldersActions,
    ExportOrder::ProjectsActions,
];

pub struct TextAddon;

impl TextAddon {
    fn write_folder(out: &mut dyn Write, folder: &Folder) -> Result<()> {
        writeln!(out, "@LIST: {}", folder.name)?;
        writeln!(out, "@ID: {}", folder.id)?;
        Self::write_description(out, &folder.description)?;
        writeln!(out)?;
        Ok(())
    }

    fn write_project(out: &mut dyn Write, project: &Folder) -> Result<()> {
        writeln!(out, "@PROJECT: {}", project.name)?;
        writeln!(out, "@ID: {}", project.id)?;
        Self::write_description(out, &project.description)?;
        writeln!(out)?;
        Ok(())
    }

    // The unfiled sentinel is not a real project; id 0 is reserved for it.
    fn write_unfiled(out: &mut dyn Write) -> Result<()> {
        writeln!(out, "@PROJECT: Unfiled")?;
        writeln!(out, "@ID: 0")?;
        Self::write_description(out, "")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_action(out: &mut dyn Write, action: &Action) -> Result<()> {
        writeln!(out, "@ACTION: {}", action.id)?;
        writeln!(out, "@STATUS: {}", action.status)?;
        Self::write_description(out, &action.description)?;
        writeln!(out)?;
        Ok(())
    }

    fn write_description(out: &mut dyn Write, text: &str) -> Result<()> {
        writeln!(out, "@DESCRIPTION: ")?;
        writeln!(out, "~~{}~~", text)?;
        Ok(())
    }

    fn write_placeholder(out: &mut dyn Write) -> Result<()> {
        writeln!(out, "(no actions)")?;
        writeln!(out)?;
        Ok(())
    }
}

impl Addon for TextAddon {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_orders(&self) -> &'static [ExportOrder] {
        SUPPORTED
    }

    fn default_order(&self) -> ExportOrder {
        ExportOrder::Actions
    }

    fn export(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
        out: &mut dyn Write,
    ) -> Result<()> {
        let order = self.resolve_order(order)?;
        let mut section = Section::new();

        for node in OrderingIter::new(model, filter, order) {
            match node {
                ExportNode::FolderMarker { folder, depth } => {
                    if section.enter_marker(depth) {
                        Self::write_placeholder(out)?;
                    }
                    Self::write_folder(out, folder)?;
                }
                ExportNode::ProjectMarker { project, depth } => {
                    if section.enter_marker(depth) {
                        Self::write_placeholder(out)?;
                    }
                    Self::write_project(out, project)?;
                }
                ExportNode::UnfiledMarker { depth } => {
                    if section.enter_marker(depth) {
                        Self::write_placeholder(out)?;
                    }
                    Self::write_unfiled(out)?;
                }
                ExportNode::Action(action) => {
                    section.enter_action();
                    Self::write_action(out, action)?;
                }
            }
        }
        if section.finish() {
            Self::write_placeholder(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
