//! Styled, self-contained HTML report (inline stylesheet, no external
//! dependencies).

use crate::addon::{Addon, Section};
use crate::model::{Action, Folder, TaskModel};
use crate::order::{ExportFilter, ExportNode, ExportOrder, OrderingIter};
use crate::style;
use anyhow::Result;
use clap::Args;
use std::io::Write;

const SUPPORTED: &[ExportOrder] = &[
    ExportOrder::Actions,
    ExportOrder::FoldersActions,
    ExportOrder::FoldersProjectsActions,
    ExportOrder::ProjectsActions,
    ExportOrder::ProjectsFoldersActions,
];

const STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 2em; color: #222; }
h2, h3 { border-bottom: 1px solid #ccc; padding-bottom: 0.2em; }
span.role { font-size: 0.7em; color: #777; font-weight: normal; }
p.none { color: #999; font-style: italic; }
div.action { margin: 0.8em 0; }
p.head { margin: 0.2em 0; font-weight: bold; }
span.stars { color: #c80; }
table.fields th, table.actions th { text-align: left; padding-right: 1em; color: #555; }
table.actions { border-collapse: collapse; }
table.actions td, table.actions th { border: 1px solid #ddd; padding: 0.2em 0.6em; }
span.open { color: #16a; }
span.resolved { color: #1a6; }
span.deleted { color: #a33; }
span.stalled { color: #981; }
";

#[derive(Debug, Clone, Args, Default)]
pub struct HtmlAddonOptions {
    /// Tabular multi-action layout instead of one block per action.
    #[arg(long = "to-compact", default_value_t = false)]
    pub compact: bool,
    /// Document title (default: "Task report").
    #[arg(long = "to-title")]
    pub title: Option<String>,
}

pub struct HtmlAddon {
    options: HtmlAddonOptions,
}

impl HtmlAddon {
    pub fn new(options: HtmlAddonOptions) -> Self {
        HtmlAddon { options }
    }

    fn escape(text: &str) -> String {
        crate::addon::html_escape(text)
    }

    fn heading(out: &mut dyn Write, depth: u8, class: &str, inner: &str) -> Result<()> {
        let tag = if depth == 0 { "h2" } else { "h3" };
        writeln!(out, "<{} class=\"{}\">{}</{}>", tag, class, inner, tag)?;
        Ok(())
    }

    fn write_block_action(out: &mut dyn Write, model: &TaskModel, action: &Action) -> Result<()> {
        let glyph = style::status_glyph(action.status);
        writeln!(out, "<div class=\"action\">")?;
        writeln!(
            out,
            "<p class=\"head\"><span class=\"glyph {}\">{}</span> <span class=\"desc\">{}</span> \
             <span class=\"stars\">{}</span></p>",
            glyph.css_class,
            glyph.symbol,
            Self::escape(&action.description),
            style::priority_stars(action.priority),
        )?;
        writeln!(out, "<table class=\"fields\">")?;
        writeln!(out, "<tr><th>Status</th><td>{}</td></tr>", action.status)?;
        writeln!(
            out,
            "<tr><th>Created</th><td>{}</td></tr>",
            action.created.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(
            out,
            "<tr><th>Reminder</th><td>{}</td></tr>",
            action
                .reminder
                .map(|r| r.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "None".to_string())
        )?;
        writeln!(
            out,
            "<tr><th>Priority</th><td>{}</td></tr>",
            Self::priority_cell(action)
        )?;
        writeln!(
            out,
            "<tr><th>Project</th><td>{}</td></tr>",
            Self::project_cell(model, action)
        )?;
        if let Some(url) = &action.url {
            let url = Self::escape(url);
            writeln!(
                out,
                "<tr><th>URL</th><td><a href=\"{}\">{}</a></td></tr>",
                url, url
            )?;
        }
        writeln!(out, "</table>")?;
        writeln!(out, "</div>")?;
        Ok(())
    }

    fn write_compact_row(out: &mut dyn Write, model: &TaskModel, action: &Action) -> Result<()> {
        let glyph = style::status_glyph(action.status);
        let description = match &action.url {
            Some(url) => format!(
                "<a href=\"{}\">{}</a>",
                Self::escape(url),
                Self::escape(&action.description)
            ),
            None => Self::escape(&action.description),
        };
        writeln!(
            out,
            "<tr><td><span class=\"glyph {}\">{}</span></td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>",
            glyph.css_class,
            glyph.symbol,
            description,
            action.created.format("%Y-%m-%d %H:%M"),
            Self::priority_cell(action),
            action
                .reminder
                .map(|r| r.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "None".to_string()),
            Self::project_cell(model, action),
        )?;
        Ok(())
    }

    fn priority_cell(action: &Action) -> String {
        match action.priority {
            None => "None".to_string(),
            some => style::priority_stars(some).to_string(),
        }
    }

    fn project_cell(model: &TaskModel, action: &Action) -> String {
        model
            .project_of(action)
            .map(|p| Self::escape(&p.name))
            .unwrap_or_else(|| "None".to_string())
    }
}

impl Addon for HtmlAddon {
    fn name(&self) -> &'static str {
        "html"
    }

    fn supported_orders(&self) -> &'static [ExportOrder] {
        SUPPORTED
    }

    fn default_order(&self) -> ExportOrder {
        ExportOrder::FoldersProjectsActions
    }

    fn export(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
        out: &mut dyn Write,
    ) -> Result<()> {
        let order = self.resolve_order(order)?;
        let title = self.options.title.as_deref().unwrap_or("Task report");

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\"/>")?;
        writeln!(out, "<title>{}</title>", Self::escape(title))?;
        writeln!(out, "<style>{}</style>", STYLESHEET)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{}</h1>", Self::escape(title))?;

        let mut section = Section::new();
        let mut table_open = false;
        for node in OrderingIter::new(model, filter, order) {
            if node.is_marker() && table_open {
                writeln!(out, "</table>")?;
                table_open = false;
            }
            match node {
                ExportNode::FolderMarker { folder, depth } => {
                    if section.enter_marker(depth) {
                        writeln!(out, "<p class=\"none\">No actions.</p>")?;
                    }
                    let inner = format!(
                        "{} <span class=\"role\">{}</span>",
                        Self::escape(&folder.name),
                        style::role_label(folder)
                    );
                    Self::heading(out, depth, "folder", &inner)?;
                }
                ExportNode::ProjectMarker { project, depth } => {
                    if section.enter_marker(depth) {
                        writeln!(out, "<p class=\"none\">No actions.</p>")?;
                    }
                    let inner = format!(
                        "{} <span class=\"role\">Project</span>",
                        Self::escape(&project.name)
                    );
                    Self::heading(out, depth, "project", &inner)?;
                }
                ExportNode::UnfiledMarker { depth } => {
                    if section.enter_marker(depth) {
                        writeln!(out, "<p class=\"none\">No actions.</p>")?;
                    }
                    Self::heading(out, depth, "unfiled", "Unfiled")?;
                }
                ExportNode::Action(action) => {
                    section.enter_action();
                    if self.options.compact {
                        if !table_open {
                            writeln!(out, "<table class=\"actions\">")?;
                            writeln!(
                                out,
                                "<tr><th></th><th>Description</th><th>Created</th>\
                                 <th>Priority</th><th>Reminder</th><th>Project</th></tr>"
                            )?;
                            table_open = true;
                        }
                        Self::write_compact_row(out, model, action)?;
                    } else {
                        Self::write_block_action(out, model, action)?;
                    }
                }
            }
        }
        if table_open {
            writeln!(out, "</table>")?;
        }
        if section.finish() {
            writeln!(out, "<p class=\"none\">No actions.</p>")?;
        }
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionStatus, Priority};
    use chrono::NaiveDate;

    fn created() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample_model() -> TaskModel {
        let mut model = TaskModel::new();
        model.add_folder(Folder::new(1, "Errands"));
        model.add_folder(Folder::new(2, "Empty"));
        model.add_folder(Folder::new(10, "Home <& Garden>").into_project());
        let mut action = Action::new(7, "Buy milk", 1, created());
        action.status = ActionStatus::Resolved;
        action.priority = Some(Priority::Medium);
        action.project = Some(10);
        action.url = Some("http://example.com/milk".to_string());
        model.add_action(action);
        model.add_action(Action::new(8, "Sharpen saw", 1, created()));
        model
    }

    fn export_string(model: &TaskModel, options: HtmlAddonOptions, order: ExportOrder) -> String {
        let filter = ExportFilter::all(model);
        let mut buf = Vec::new();
        HtmlAddon::new(options)
            .export(model, &filter, order, &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_block_layout_fields_and_missing_values() {
        let model = sample_model();
        let output = export_string(
            &model,
            HtmlAddonOptions::default(),
            ExportOrder::FoldersActions,
        );

        assert!(output.contains("<style>"));
        assert!(output.contains("Errands <span class=\"role\">List</span>"));
        assert!(output.contains("<span class=\"glyph resolved\">"));
        assert!(output.contains("<tr><th>Project</th><td>Home &lt;&amp; Garden&gt;</td></tr>"));
        assert!(output.contains("<a href=\"http://example.com/milk\">"));
        // Action 8 has no reminder, priority, project, or URL.
        assert!(output.contains("<tr><th>Reminder</th><td>None</td></tr>"));
        assert!(output.contains("<tr><th>Priority</th><td>None</td></tr>"));
        assert!(output.contains("<tr><th>Project</th><td>None</td></tr>"));
        let url_rows = output.matches("<tr><th>URL</th>").count();
        assert_eq!(url_rows, 1);
    }

    #[test]
    fn test_empty_section_placeholder() {
        let model = sample_model();
        let output = export_string(
            &model,
            HtmlAddonOptions::default(),
            ExportOrder::FoldersActions,
        );
        // "Empty" is the last folder; its placeholder lands before </body>.
        let empty = output.find("Empty <span").unwrap();
        let none = output.rfind("<p class=\"none\">No actions.</p>").unwrap();
        assert!(none > empty);
    }

    #[test]
    fn test_compact_mode_changes_layout_not_content() {
        let model = sample_model();
        let block = export_string(
            &model,
            HtmlAddonOptions::default(),
            ExportOrder::FoldersActions,
        );
        let compact = export_string(
            &model,
            HtmlAddonOptions {
                compact: true,
                title: None,
            },
            ExportOrder::FoldersActions,
        );

        assert!(compact.contains("<table class=\"actions\">"));
        assert!(!block.contains("<table class=\"actions\">"));
        // Every field the block layout renders must survive the layout
        // switch: description, created, priority, reminder, project, URL.
        for needle in [
            "Buy milk",
            "Sharpen saw",
            "2026-03-01 12:00",
            "**",
            "None",
            "Home &lt;&amp; Garden&gt;",
            "http://example.com/milk",
        ] {
            assert!(block.contains(needle), "block output misses {}", needle);
            assert!(compact.contains(needle), "compact output misses {}", needle);
        }
    }

    #[test]
    fn test_format_specific_resolves_to_default_order() {
        let model = sample_model();
        let output = export_string(
            &model,
            HtmlAddonOptions::default(),
            ExportOrder::FormatSpecific,
        );
        // Default order nests projects below folders.
        assert!(output.contains("<h3 class=\"project\">"));
    }
}
