use anyhow::Result;
use std::io::Write;

use crate::addon::html::{HtmlAddon, HtmlAddonOptions};
use crate::addon::pdf::{PdfAddon, PdfAddonOptions};
use crate::addon::text::TextAddon;
use crate::addon::xml::XmlAddon;
use crate::addon::Addon;
use crate::loader::XmlModelLoader;
use crate::model::ActionStatus;
use crate::order::{ExportFilter, ExportOrder};

/// Options for the selected export add-on.
pub enum AddonOptions {
    Text,
    Xml,
    Html(HtmlAddonOptions),
    Pdf(PdfAddonOptions),
}

/// Traversal filter settings collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Folder ids to include; `None` includes every folder.
    pub folders: Option<Vec<u32>>,
    /// Project ids to include; `None` includes every project.
    pub projects: Option<Vec<u32>>,
    /// Leave out actions that have no project in project-grouped orders.
    pub skip_unfiled: bool,
    /// Export only actions with Open status.
    pub open_only: bool,
}

/// Loads the model from serialized XML and runs one export to `out`.
pub fn run_export(
    input: &str,
    out: &mut dyn Write,
    order: ExportOrder,
    addon_options: AddonOptions,
    filter_options: FilterOptions,
) -> Result<()> {
    let model = XmlModelLoader::load(input)?;

    let mut filter = ExportFilter::all(&model);
    if let Some(ids) = filter_options.folders {
        filter.folders = ids.into_iter().collect();
    }
    if let Some(ids) = filter_options.projects {
        filter.projects = ids.into_iter().collect();
    }
    filter.include_unfiled = !filter_options.skip_unfiled;
    if filter_options.open_only {
        filter = filter.with_predicate(|a| a.status == ActionStatus::Open);
    }

    let addon: Box<dyn Addon> = match addon_options {
        AddonOptions::Text => Box::new(TextAddon),
        AddonOptions::Xml => Box::new(XmlAddon),
        AddonOptions::Html(options) => Box::new(HtmlAddon::new(options)),
        AddonOptions::Pdf(options) => Box::new(PdfAddon::new(options)),
    };
    addon.export(&model, &filter, order, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<taskmodel>
  <folders>
    <folder id="1" open="1" total="2"><name>Errands</name><description></description></folder>
    <folder id="10" open="0" total="0" project="true"><name>Home</name><description></description></folder>
  </folders>
  <actions>
    <action id="7" folder="1" status="Resolved" created="2026-03-01T12:00:00" project="10"><description>Buy milk</description></action>
    <action id="8" folder="1" status="Open" created="2026-03-02T09:00:00"><description>Sharpen saw</description></action>
  </actions>
</taskmodel>"#;

    #[test]
    fn test_run_export_text() {
        let mut buf = Vec::new();
        run_export(
            SAMPLE,
            &mut buf,
            ExportOrder::Actions,
            AddonOptions::Text,
            FilterOptions::default(),
        )
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("@ACTION: 7"));
        assert!(output.contains("@ACTION: 8"));
    }

    #[test]
    fn test_run_export_open_only_filter() {
        let mut buf = Vec::new();
        run_export(
            SAMPLE,
            &mut buf,
            ExportOrder::Actions,
            AddonOptions::Text,
            FilterOptions {
                open_only: true,
                ..FilterOptions::default()
            },
        )
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(!output.contains("@ACTION: 7"));
        assert!(output.contains("@ACTION: 8"));
    }

    #[test]
    fn test_run_export_unsupported_order_fails_cleanly() {
        let mut buf = Vec::new();
        let result = run_export(
            SAMPLE,
            &mut buf,
            ExportOrder::FoldersActions,
            AddonOptions::Xml,
            FilterOptions::default(),
        );
        assert!(result.is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_run_export_html_with_options() {
        let mut buf = Vec::new();
        run_export(
            SAMPLE,
            &mut buf,
            ExportOrder::ProjectsActions,
            AddonOptions::Html(HtmlAddonOptions {
                compact: true,
                title: Some("Weekly review".to_string()),
            }),
            FilterOptions::default(),
        )
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("<h1>Weekly review</h1>"));
        assert!(output.contains("<table class=\"actions\">"));
    }
}
