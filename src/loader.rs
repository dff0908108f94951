//! Loads a task model from the XML schema the XML add-on writes.
//!
//! Text content is taken as-is: leading/trailing whitespace and inner
//! indentation of name, description, and url elements survive a
//! write-then-load round trip.

use crate::model::{Action, ActionStatus, Folder, TaskModel};
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Name,
    Description,
    Url,
}

pub struct XmlModelLoader;

impl XmlModelLoader {
    /// Parses a serialized model and validates it.
    pub fn load(input: &str) -> Result<TaskModel> {
        let mut reader = Reader::from_reader(input.as_bytes());

        let mut model = TaskModel::new();
        let mut buf = Vec::new();
        let mut folder: Option<Folder> = None;
        let mut action: Option<Action> = None;
        let mut target = TextTarget::None;

        loop {
            match reader.read_event_into(&mut buf) {
                Err(e) => {
                    return Err(anyhow!(
                        "XML error at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    ))
                }
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"folder" => folder = Some(Self::folder_from(&e)?),
                    b"action" => action = Some(Self::action_from(&e)?),
                    b"name" => target = TextTarget::Name,
                    b"description" => target = TextTarget::Description,
                    b"url" => target = TextTarget::Url,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"folder" => model.add_folder(Self::folder_from(&e)?),
                    b"action" => model.add_action(Self::action_from(&e)?),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"folder" => model.add_folder(
                        folder
                            .take()
                            .ok_or_else(|| anyhow!("unexpected </folder>"))?,
                    ),
                    b"action" => model.add_action(
                        action
                            .take()
                            .ok_or_else(|| anyhow!("unexpected </action>"))?,
                    ),
                    b"name" | b"description" | b"url" => target = TextTarget::None,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    let text = e.decode()?.into_owned();
                    Self::append_text(target, &mut folder, &mut action, &text);
                }
                // Entity and character references arrive as separate events;
                // the surrounding text does not include them.
                Ok(Event::GeneralRef(e)) => {
                    let text = Self::resolve_reference(&e)?;
                    Self::append_text(target, &mut folder, &mut action, &text);
                }
                _ => {}
            }
            buf.clear();
        }

        model.validate()?;
        Ok(model)
    }

    fn append_text(
        target: TextTarget,
        folder: &mut Option<Folder>,
        action: &mut Option<Action>,
        text: &str,
    ) {
        match target {
            TextTarget::Name => {
                if let Some(f) = folder.as_mut() {
                    f.name.push_str(text);
                }
            }
            TextTarget::Description => {
                if let Some(a) = action.as_mut() {
                    a.description.push_str(text);
                } else if let Some(f) = folder.as_mut() {
                    f.description.push_str(text);
                }
            }
            TextTarget::Url => {
                if let Some(a) = action.as_mut() {
                    a.url.get_or_insert_with(String::new).push_str(text);
                }
            }
            TextTarget::None => {}
        }
    }

    /// Resolves a character reference or one of the five predefined XML
    /// entities.
    fn resolve_reference(e: &BytesRef) -> Result<String> {
        if let Some(c) = e.resolve_char_ref()? {
            return Ok(c.to_string());
        }
        let name = e.decode()?;
        match name.as_ref() {
            "lt" => Ok("<".to_string()),
            "gt" => Ok(">".to_string()),
            "amp" => Ok("&".to_string()),
            "apos" => Ok("'".to_string()),
            "quot" => Ok("\"".to_string()),
            other => Err(anyhow!("unknown entity reference \"&{};\"", other)),
        }
    }

    fn folder_from(e: &BytesStart) -> Result<Folder> {
        let mut folder = Folder::new(0, "");
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"id" => folder.id = value.parse().context("folder id")?,
                b"open" => folder.open_count = value.parse().context("folder open count")?,
                b"total" => folder.total_count = value.parse().context("folder total count")?,
                b"project" => folder.role.project = &*value == "true",
                b"list" => folder.role.action_list = &*value == "true",
                b"inbox" => folder.role.inbox = &*value == "true",
                b"next" => folder.role.next_queue = &*value == "true",
                b"reference" => folder.role.reference = &*value == "true",
                b"someday" => folder.role.someday = &*value == "true",
                b"builtin" => folder.role.built_in = &*value == "true",
                _ => {}
            }
        }
        Ok(folder)
    }

    fn action_from(e: &BytesStart) -> Result<Action> {
        let mut id: u32 = 0;
        let mut owner: u32 = 0;
        let mut status = ActionStatus::Open;
        let mut created: Option<NaiveDateTime> = None;
        let mut project: Option<u32> = None;
        let mut priority = None;
        let mut reminder: Option<NaiveDate> = None;

        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?;
            match attr.key.as_ref() {
                b"id" => id = value.parse().context("action id")?,
                b"folder" => owner = value.parse().context("action folder id")?,
                b"status" => status = value.parse()?,
                b"created" => {
                    created = Some(
                        NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S")
                            .context("action created timestamp")?,
                    )
                }
                b"project" => project = Some(value.parse().context("action project id")?),
                b"priority" => priority = Some(value.parse()?),
                b"reminder" => {
                    reminder = Some(
                        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                            .context("action reminder date")?,
                    )
                }
                _ => {}
            }
        }

        let created =
            created.ok_or_else(|| anyhow!("action {} is missing its created timestamp", id))?;
        let mut action = Action::new(id, "", owner, created);
        action.status = status;
        action.project = project;
        action.priority = priority;
        action.reminder = reminder;
        Ok(action)
    }
}
