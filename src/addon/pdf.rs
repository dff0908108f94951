//! PDF report built on `pdf_oxide`.
//!
//! The traversal is rendered into the small HTML subset the PDF builder
//! understands (headings, paragraphs, lists, bold/italic), then laid out
//! with the configured page size, margins, and base font size. The whole
//! document is produced in memory before the first byte reaches the
//! writer.

use crate::addon::{html_escape, Addon, Section};
use crate::model::{Action, TaskModel};
use crate::order::{ExportFilter, ExportNode, ExportOrder, OrderingIter};
use crate::style;
use anyhow::Result;
use clap::{Args, ValueEnum};
use pdf_oxide::api::PdfBuilder;
use pdf_oxide::writer::PageSize;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::mpsc;
use std::thread;

const SUPPORTED: &[ExportOrder] = &[
    ExportOrder::Actions,
    ExportOrder::FoldersActions,
    ExportOrder::FoldersProjectsActions,
    ExportOrder::ProjectsActions,
    ExportOrder::ProjectsFoldersActions,
];

/// Page sizes exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageKind {
    Letter,
    A4,
    Legal,
    A3,
}

impl PageKind {
    fn to_page_size(self) -> PageSize {
        match self {
            PageKind::Letter => PageSize::Letter,
            PageKind::A4 => PageSize::A4,
            PageKind::Legal => PageSize::Legal,
            PageKind::A3 => PageSize::A3,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PdfAddonOptions {
    /// Page size.
    #[arg(long = "to-page", value_enum, default_value = "a4")]
    pub page: PageKind,
    /// Page margin in points, applied to all four sides.
    #[arg(long = "to-margin", default_value_t = 54.0)]
    pub margin: f32,
    /// Base font size in points.
    #[arg(long = "to-font-size", default_value_t = 11.0)]
    pub font_size: f32,
    /// Document title (default: "Task report").
    #[arg(long = "to-title")]
    pub title: Option<String>,
    /// One line per action instead of one block per action.
    #[arg(long = "to-compact", default_value_t = false)]
    pub compact: bool,
}

impl Default for PdfAddonOptions {
    fn default() -> Self {
        PdfAddonOptions {
            page: PageKind::A4,
            margin: 54.0,
            font_size: 11.0,
            title: None,
            compact: false,
        }
    }
}

pub struct PdfAddon {
    options: PdfAddonOptions,
}

impl PdfAddon {
    pub fn new(options: PdfAddonOptions) -> Self {
        PdfAddon { options }
    }

    fn push_action(body: &mut String, model: &TaskModel, action: &Action, compact: bool) {
        let glyph = style::status_glyph(action.status);
        let stars = style::priority_stars(action.priority);
        let reminder = action
            .reminder
            .map(|r| r.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "None".to_string());
        let project = model
            .project_of(action)
            .map(|p| html_escape(&p.name))
            .unwrap_or_else(|| "None".to_string());
        let description = html_escape(&action.description);

        if compact {
            let mut line = format!("<li>{} <b>{}</b>", glyph.symbol, description);
            if !stars.is_empty() {
                let _ = write!(line, " [{}]", stars);
            }
            let _ = write!(
                line,
                " ({}, created {}, reminder {}, project {})",
                action.status,
                action.created.format("%Y-%m-%d %H:%M"),
                reminder,
                project
            );
            if let Some(url) = &action.url {
                let _ = write!(line, " &lt;{}&gt;", html_escape(url));
            }
            line.push_str("</li>\n");
            body.push_str(&line);
        } else {
            let _ = writeln!(body, "<p><b>{} {}</b> {}</p>", glyph.symbol, description, stars);
            body.push_str("<ul>\n");
            let _ = writeln!(body, "<li>Status: {}</li>", action.status);
            let _ = writeln!(body, "<li>Created: {}</li>", action.created.format("%Y-%m-%d %H:%M"));
            let _ = writeln!(body, "<li>Reminder: {}</li>", reminder);
            let _ = writeln!(
                body,
                "<li>Priority: {}</li>",
                if stars.is_empty() { "None" } else { stars }
            );
            let _ = writeln!(body, "<li>Project: {}</li>", project);
            if let Some(url) = &action.url {
                let _ = writeln!(body, "<li>URL: {}</li>", html_escape(url));
            }
            body.push_str("</ul>\n");
        }
    }

    /// Renders the whole traversal into the HTML subset the PDF layout
    /// engine accepts.
    fn render_body(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
    ) -> String {
        let title = self.options.title.as_deref().unwrap_or("Task report");
        let mut body = format!("<h1>{}</h1>\n", html_escape(title));
        let mut section = Section::new();
        let mut list_open = false;

        for node in OrderingIter::new(model, filter, order) {
            if node.is_marker() && list_open {
                body.push_str("</ul>\n");
                list_open = false;
            }
            if let Some(depth) = node.depth() {
                if section.enter_marker(depth) {
                    body.push_str("<p><i>No actions.</i></p>\n");
                }
                let tag = if depth == 0 { "h2" } else { "h3" };
                let label = match node {
                    ExportNode::FolderMarker { folder, .. } => format!(
                        "{} ({})",
                        html_escape(&folder.name),
                        style::role_label(folder)
                    ),
                    ExportNode::ProjectMarker { project, .. } => {
                        format!("{} (Project)", html_escape(&project.name))
                    }
                    _ => "Unfiled".to_string(),
                };
                let _ = writeln!(body, "<{}>{}</{}>", tag, label, tag);
            } else if let ExportNode::Action(action) = node {
                section.enter_action();
                if self.options.compact && !list_open {
                    body.push_str("<ul>\n");
                    list_open = true;
                }
                Self::push_action(&mut body, model, action, self.options.compact);
            }
        }
        if list_open {
            body.push_str("</ul>\n");
        }
        if section.finish() {
            body.push_str("<p><i>No actions.</i></p>\n");
        }
        body
    }
}

impl Addon for PdfAddon {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_orders(&self) -> &'static [ExportOrder] {
        SUPPORTED
    }

    fn default_order(&self) -> ExportOrder {
        ExportOrder::ProjectsActions
    }

    fn export(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
        out: &mut dyn Write,
    ) -> Result<()> {
        let order = self.resolve_order(order)?;
        let body = self.render_body(model, filter, order);

        let mut builder = PdfBuilder::new()
            .page_size(self.options.page.to_page_size())
            .margin(self.options.margin)
            .font_size(self.options.font_size);
        if let Some(title) = &self.options.title {
            builder = builder.title(title);
        }
        let pdf = builder.from_html(&body)?;

        out.write_all(pdf.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Font names the PDF layer renders without embedding.
pub const BASE_FONTS: &[&str] = &[
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Courier",
];

/// Fire-and-forget background computation whose result is consulted only if
/// it is ready by the time it is needed.
///
/// Used to warm the font-name list before an options prompt; export
/// correctness never depends on it.
pub struct Prefetch<T> {
    rx: mpsc::Receiver<T>,
    ready: Option<T>,
}

impl<T: Send + 'static> Prefetch<T> {
    pub fn spawn(job: impl FnOnce() -> T + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may already be gone; that is fine.
            let _ = tx.send(job());
        });
        Prefetch { rx, ready: None }
    }

    /// Returns the result if the background job has finished, without
    /// blocking.
    pub fn try_ready(&mut self) -> Option<&T> {
        if self.ready.is_none() {
            if let Ok(value) = self.rx.try_recv() {
                self.ready = Some(value);
            }
        }
        self.ready.as_ref()
    }

    /// Blocks until the result is available.
    pub fn wait(mut self) -> Option<T> {
        if self.ready.is_none() {
            self.ready = self.rx.recv().ok();
        }
        self.ready
    }
}

/// Starts loading the available font names in the background.
pub fn prefetch_font_names() -> Prefetch<Vec<String>> {
    Prefetch::spawn(|| BASE_FONTS.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, ActionStatus, Folder, TaskModel};
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
        model.add_folder(Folder::new(10, "Home").into_project());
        let mut action = Action::new(7, "Buy milk", 1, created());
        action.project = Some(10);
        action.status = ActionStatus::Resolved;
        model.add_action(action);
        model.add_action(Action::new(8, "Sharpen saw", 1, created()));
        model
    }

    #[test]
    fn test_body_block_layout() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let addon = PdfAddon::new(PdfAddonOptions::default());
        let body = addon.render_body(&model, &filter, ExportOrder::ProjectsActions);

        assert!(body.starts_with("<h1>Task report</h1>"));
        assert!(body.contains("<h2>Home (Project)</h2>"));
        assert!(body.contains("<h2>Unfiled</h2>"));
        assert!(body.contains("<li>Status: Resolved</li>"));
        assert!(body.contains("<li>Project: None</li>"));
    }

    #[test]
    fn test_body_compact_layout_keeps_all_actions() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let block = PdfAddon::new(PdfAddonOptions::default()).render_body(
            &model,
            &filter,
            ExportOrder::ProjectsActions,
        );
        let compact = PdfAddon::new(PdfAddonOptions {
            compact: true,
            ..PdfAddonOptions::default()
        })
        .render_body(&model, &filter, ExportOrder::ProjectsActions);

        // Same fields in both layouts, only the arrangement differs.
        for needle in ["Buy milk", "Sharpen saw", "Resolved", "2026-03-01 12:00"] {
            assert!(block.contains(needle), "block output misses {}", needle);
            assert!(compact.contains(needle), "compact output misses {}", needle);
        }
        assert!(compact.contains("<li>\u{2713} <b>Buy milk</b>"));
        assert!(!compact.contains("<li>Status:"));
    }

    #[test]
    fn test_export_produces_pdf_bytes() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let mut buf = Vec::new();
        PdfAddon::new(PdfAddonOptions::default())
            .export(&model, &filter, ExportOrder::ProjectsActions, &mut buf)
            .unwrap();
        assert!(buf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_rejects_format_specific_only_for_unknown_orders() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let mut buf = Vec::new();
        // FormatSpecific resolves to the default order instead of failing.
        PdfAddon::new(PdfAddonOptions::default())
            .export(&model, &filter, ExportOrder::FormatSpecific, &mut buf)
            .unwrap();
        assert!(buf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_prefetch_font_names() {
        let mut prefetch = prefetch_font_names();
        // try_ready never blocks; wait always yields the full list.
        let _ = prefetch.try_ready();
        let names = prefetch.wait().unwrap();
        assert!(names.iter().any(|n| n == "Helvetica"));
    }
}
