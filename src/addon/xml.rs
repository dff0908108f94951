//! Raw XML serialization of the filtered model.
//!
//! This add-on ignores grouping requests: it honors only `FormatSpecific`
//! and dumps folders and actions with their folder/project keys, leaving
//! any regrouping to the consumer. `loader` parses the same schema back.

use crate::addon::Addon;
use crate::model::{Action, Folder, TaskModel};
use crate::order::{ExportFilter, ExportOrder};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Write};

const SUPPORTED: &[ExportOrder] = &[ExportOrder::FormatSpecific];

pub struct XmlAddon;

impl XmlAddon {
    fn write_folder<W: Write>(w: &mut Writer<W>, folder: &Folder) -> io::Result<()> {
        let id = folder.id.to_string();
        let open = folder.open_count.to_string();
        let total = folder.total_count.to_string();

        let mut element = w
            .create_element("folder")
            .with_attribute(("id", id.as_str()))
            .with_attribute(("open", open.as_str()))
            .with_attribute(("total", total.as_str()));
        let role = &folder.role;
        for (flag, name) in [
            (role.project, "project"),
            (role.action_list, "list"),
            (role.inbox, "inbox"),
            (role.next_queue, "next"),
            (role.reference, "reference"),
            (role.someday, "someday"),
            (role.built_in, "builtin"),
        ] {
            if flag {
                element = element.with_attribute((name, "true"));
            }
        }
        element.write_inner_content(|w| -> io::Result<()> {
            w.create_element("name")
                .write_text_content(BytesText::new(&folder.name))?;
            w.create_element("description")
                .write_text_content(BytesText::new(&folder.description))?;
            Ok(())
        })?;
        Ok(())
    }

    fn write_action<W: Write>(w: &mut Writer<W>, action: &Action) -> io::Result<()> {
        let id = action.id.to_string();
        let folder = action.folder.to_string();
        let status = action.status.to_string();
        let created = action.created.format("%Y-%m-%dT%H:%M:%S").to_string();
        let project = action.project.map(|p| p.to_string());
        let priority = action.priority.map(|p| p.to_string());
        let reminder = action.reminder.map(|r| r.format("%Y-%m-%d").to_string());

        let mut element = w
            .create_element("action")
            .with_attribute(("id", id.as_str()))
            .with_attribute(("folder", folder.as_str()))
            .with_attribute(("status", status.as_str()))
            .with_attribute(("created", created.as_str()));
        if let Some(project) = &project {
            element = element.with_attribute(("project", project.as_str()));
        }
        if let Some(priority) = &priority {
            element = element.with_attribute(("priority", priority.as_str()));
        }
        if let Some(reminder) = &reminder {
            element = element.with_attribute(("reminder", reminder.as_str()));
        }
        element.write_inner_content(|w| -> io::Result<()> {
            w.create_element("description")
                .write_text_content(BytesText::new(&action.description))?;
            if let Some(url) = &action.url {
                w.create_element("url")
                    .write_text_content(BytesText::new(url))?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl Addon for XmlAddon {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn supported_orders(&self) -> &'static [ExportOrder] {
        SUPPORTED
    }

    fn default_order(&self) -> ExportOrder {
        ExportOrder::FormatSpecific
    }

    fn export(
        &self,
        model: &TaskModel,
        filter: &ExportFilter,
        order: ExportOrder,
        out: &mut dyn Write,
    ) -> Result<()> {
        self.resolve_order(order)?;

        let mut buf: Vec<u8> = Vec::new();
        let mut writer = Writer::new_with_indent(&mut buf, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer
            .create_element("taskmodel")
            .write_inner_content(|w| -> io::Result<()> {
                w.create_element("folders").write_inner_content(|w| -> io::Result<()> {
                    for folder in model.folders.iter().filter(|f| {
                        if f.is_project() {
                            filter.projects.contains(&f.id)
                        } else {
                            filter.folders.contains(&f.id)
                        }
                    }) {
                        Self::write_folder(w, folder)?;
                    }
                    Ok(())
                })?;
                w.create_element("actions").write_inner_content(|w| -> io::Result<()> {
                    for action in model.actions.iter().filter(|a| filter.passes(a)) {
                        Self::write_action(w, action)?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;

        out.write_all(&buf)?;
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
        let mut inbox = Folder::new(1, "Inbox");
        inbox.role.inbox = true;
        model.add_folder(inbox);
        model.add_folder(Folder::new(10, "Home").into_project());
        let mut action = Action::new(7, "Buy <milk> & eggs", 1, created());
        action.status = ActionStatus::Resolved;
        action.priority = Some(Priority::High);
        action.project = Some(10);
        action.reminder = NaiveDate::from_ymd_opt(2026, 4, 1);
        action.url = Some("http://example.com/milk".to_string());
        model.add_action(action);
        model
    }

    #[test]
    fn test_xml_structure_and_escaping() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let mut buf = Vec::new();
        XmlAddon
            .export(&model, &filter, ExportOrder::FormatSpecific, &mut buf)
            .unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(output.contains("<folder id=\"1\" open=\"0\" total=\"0\" inbox=\"true\">"));
        assert!(output.contains("<folder id=\"10\" open=\"0\" total=\"0\" project=\"true\">"));
        assert!(output.contains(
            "<action id=\"7\" folder=\"1\" status=\"Resolved\" created=\"2026-03-01T12:00:00\" \
             project=\"10\" priority=\"High\" reminder=\"2026-04-01\">"
        ));
        assert!(output.contains("<description>Buy &lt;milk&gt; &amp; eggs</description>"));
        assert!(output.contains("<url>http://example.com/milk</url>"));
    }

    #[test]
    fn test_filter_limits_serialized_subset() {
        let model = sample_model();
        let mut filter = ExportFilter::all(&model);
        filter.projects.clear();
        let mut buf = Vec::new();
        XmlAddon
            .export(&model, &filter, ExportOrder::FormatSpecific, &mut buf)
            .unwrap();
        let output = String::from_utf8(buf).unwrap();

        // The excluded project and the action referencing it are both gone.
        assert!(!output.contains("<folder id=\"10\""));
        assert!(!output.contains("<action id=\"7\""));
        assert!(output.contains("<folder id=\"1\""));
    }

    #[test]
    fn test_grouping_orders_are_rejected_without_output() {
        let model = sample_model();
        let filter = ExportFilter::all(&model);
        let mut buf = Vec::new();
        assert!(XmlAddon
            .export(&model, &filter, ExportOrder::FoldersActions, &mut buf)
            .is_err());
        assert!(buf.is_empty());
    }
}
