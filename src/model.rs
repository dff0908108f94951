use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents errors that can occur during model validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// Indicates a validation failure with a descriptive message.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Action priority, ordered from lowest to highest.
///
/// An absent priority (`Option::<Priority>::None`) sorts below `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            _ => Err(ModelError::ValidationError(format!(
                "invalid priority \"{}\" (expected Low, Medium or High)",
                s
            ))),
        }
    }
}

/// Lifecycle status of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Open,
    Resolved,
    Deleted,
    Stalled,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionStatus::Open => "Open",
            ActionStatus::Resolved => "Resolved",
            ActionStatus::Deleted => "Deleted",
            ActionStatus::Stalled => "Stalled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ActionStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(ActionStatus::Open),
            "Resolved" => Ok(ActionStatus::Resolved),
            "Deleted" => Ok(ActionStatus::Deleted),
            "Stalled" => Ok(ActionStatus::Stalled),
            _ => Err(ModelError::ValidationError(format!(
                "invalid status \"{}\" (expected Open, Resolved, Deleted or Stalled)",
                s
            ))),
        }
    }
}

/// Role flags of a folder.
///
/// `project` is mutually exclusive with every other flag; a folder with no
/// flag set is a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderRole {
    /// The folder is a project; actions may reference it by id.
    pub project: bool,
    /// Plain action list.
    pub action_list: bool,
    /// Inbox ("in-bucket") for unprocessed items.
    pub inbox: bool,
    /// Next-action queue.
    pub next_queue: bool,
    /// Reference material list.
    pub reference: bool,
    /// Someday/maybe list.
    pub someday: bool,
    /// Built-in default folder created by the application.
    pub built_in: bool,
}

impl FolderRole {
    fn non_project_flag_count(&self) -> usize {
        [
            self.action_list,
            self.inbox,
            self.next_queue,
            self.reference,
            self.someday,
            self.built_in,
        ]
        .iter()
        .filter(|&&v| v)
        .count()
    }
}

/// A named grouping of actions: a plain list or, if flagged, a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub role: FolderRole,
    /// Number of open items in the folder.
    pub open_count: u32,
    /// Total number of items in the folder.
    pub total_count: u32,
}

impl Folder {
    pub fn new(id: u32, name: &str) -> Self {
        Folder {
            id,
            name: name.to_string(),
            description: String::new(),
            role: FolderRole::default(),
            open_count: 0,
            total_count: 0,
        }
    }

    /// Marks the folder as a project.
    pub fn into_project(mut self) -> Self {
        self.role.project = true;
        self
    }

    pub fn is_project(&self) -> bool {
        self.role.project
    }

    /// Validates the folder. `project` must not be combined with any other
    /// role flag.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.role.project && self.role.non_project_flag_count() > 0 {
            return Err(ModelError::ValidationError(format!(
                "folder \"{}\" combines the project role with another role flag",
                self.name
            )));
        }
        Ok(())
    }
}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: u32,
    pub description: String,
    pub created: NaiveDateTime,
    pub reminder: Option<NaiveDate>,
    pub priority: Option<Priority>,
    /// Id of the referenced project folder, if any.
    pub project: Option<u32>,
    pub url: Option<String>,
    pub status: ActionStatus,
    /// Id of the owning folder.
    pub folder: u32,
}

impl Action {
    pub fn new(id: u32, description: &str, folder: u32, created: NaiveDateTime) -> Self {
        Action {
            id,
            description: description.to_string(),
            created,
            reminder: None,
            priority: None,
            project: None,
            url: None,
            status: ActionStatus::Open,
            folder,
        }
    }
}

/// The in-memory collection of folders and actions.
///
/// Insertion order is the collection's natural order; every traversal
/// respects it for both folders and actions.
#[derive(Debug, Clone, Default)]
pub struct TaskModel {
    pub folders: Vec<Folder>,
    pub actions: Vec<Action>,
}

impl TaskModel {
    /// Creates a new, empty model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Looks up a folder by id.
    pub fn folder(&self, id: u32) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Resolves the project folder an action references, if any.
    pub fn project_of(&self, action: &Action) -> Option<&Folder> {
        action.project.and_then(|id| self.folder(id))
    }

    /// Validates the entire model.
    ///
    /// Checks role-flag conflicts, duplicate folder and action ids, and
    /// dangling folder/project references.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (i, folder) in self.folders.iter().enumerate() {
            folder.validate()?;
            if self.folders[..i].iter().any(|f| f.id == folder.id) {
                return Err(ModelError::ValidationError(format!(
                    "duplicate folder id {}",
                    folder.id
                )));
            }
        }
        for (i, action) in self.actions.iter().enumerate() {
            if self.actions[..i].iter().any(|a| a.id == action.id) {
                return Err(ModelError::ValidationError(format!(
                    "duplicate action id {}",
                    action.id
                )));
            }
            if self.folder(action.folder).is_none() {
                return Err(ModelError::ValidationError(format!(
                    "action {} refers to unknown folder {}",
                    action.id, action.folder
                )));
            }
            if let Some(project_id) = action.project {
                match self.folder(project_id) {
                    Some(f) if f.is_project() => {}
                    Some(_) => {
                        return Err(ModelError::ValidationError(format!(
                            "action {} refers to folder {} which is not a project",
                            action.id, project_id
                        )));
                    }
                    None => {
                        return Err(ModelError::ValidationError(format!(
                            "action {} refers to unknown project {}",
                            action.id, project_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks if the model is valid.
    ///
    /// This is a convenience method that returns `true` if `validate` returns
    /// `Ok(())`, and `false` otherwise.
    pub fn valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_folder_new() {
        let folder = Folder::new(3, "Errands");
        assert_eq!(folder.id, 3);
        assert_eq!(folder.name, "Errands");
        assert!(!folder.is_project());
        assert_eq!(folder.role, FolderRole::default());
    }

    #[test]
    fn test_folder_into_project() {
        let folder = Folder::new(10, "Home").into_project();
        assert!(folder.is_project());
        assert!(folder.validate().is_ok());
    }

    #[test]
    fn test_folder_role_conflict() {
        let mut folder = Folder::new(10, "Home").into_project();
        folder.role.inbox = true;
        assert_eq!(
            folder.validate().unwrap_err(),
            ModelError::ValidationError(
                "folder \"Home\" combines the project role with another role flag".to_string()
            )
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(None < Some(Priority::Low));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ActionStatus::Open,
            ActionStatus::Resolved,
            ActionStatus::Deleted,
            ActionStatus::Stalled,
        ] {
            assert_eq!(status.to_string().parse::<ActionStatus>().unwrap(), status);
        }
        assert!("Done".parse::<ActionStatus>().is_err());
    }

    #[test]
    fn test_model_lookup() {
        let mut model = TaskModel::new();
        model.add_folder(Folder::new(1, "Inbox"));
        model.add_folder(Folder::new(10, "Home").into_project());
        let mut action = Action::new(7, "Buy milk", 1, created());
        action.project = Some(10);
        model.add_action(action);

        assert_eq!(model.folder(10).unwrap().name, "Home");
        assert!(model.folder(99).is_none());
        assert_eq!(model.project_of(&model.actions[0]).unwrap().id, 10);
        assert!(model.valid());
    }

    #[test]
    fn test_model_duplicate_ids() {
        let mut model = TaskModel::new();
        model.add_folder(Folder::new(1, "A"));
        model.add_folder(Folder::new(1, "B"));
        assert_eq!(
            model.validate().unwrap_err(),
            ModelError::ValidationError("duplicate folder id 1".to_string())
        );
    }

    #[test]
    fn test_model_dangling_references() {
        let mut model = TaskModel::new();
        model.add_folder(Folder::new(1, "Inbox"));
        model.add_action(Action::new(1, "orphan", 2, created()));
        assert!(model.validate().is_err());

        let mut model = TaskModel::new();
        model.add_folder(Folder::new(1, "Inbox"));
        model.add_folder(Folder::new(2, "Errands"));
        let mut action = Action::new(1, "bad project ref", 1, created());
        action.project = Some(2); // folder 2 is not a project
        model.add_action(action);
        assert!(model.validate().is_err());
    }
}
