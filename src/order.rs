//! Export orders and the traversal that flattens the model into a single
//! forward-only node sequence.
//!
//! Every add-on consumes the same sequence; the requested [`ExportOrder`]
//! alone decides the grouping and nesting encoded in it.

use crate::model::{Action, Folder, TaskModel};
use clap::ValueEnum;
use std::collections::{HashSet, VecDeque};

/// Requested grouping/nesting strategy for a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportOrder {
    /// Let the add-on choose its own natural order.
    FormatSpecific,
    /// Flat list of actions, no markers.
    Actions,
    /// Folder markers, each followed by the folder's actions.
    FoldersActions,
    /// Folder markers with nested project sub-markers.
    FoldersProjectsActions,
    /// Project markers, each followed by the project's actions.
    ProjectsActions,
    /// Project markers with nested folder sub-markers.
    ProjectsFoldersActions,
}

/// Selects which folders, projects, and actions take part in a traversal.
pub struct ExportFilter {
    /// Ids of folders whose actions are included.
    pub folders: HashSet<u32>,
    /// Ids of project folders whose actions are included.
    pub projects: HashSet<u32>,
    /// Whether actions without a project appear in project-grouped orders.
    pub include_unfiled: bool,
    predicate: Option<Box<dyn Fn(&Action) -> bool>>,
}

impl ExportFilter {
    /// Creates a filter that includes every folder, every project, and
    /// actions without a project.
    pub fn all(model: &TaskModel) -> Self {
        ExportFilter {
            folders: model.folders.iter().map(|f| f.id).collect(),
            projects: model
                .folders
                .iter()
                .filter(|f| f.is_project())
                .map(|f| f.id)
                .collect(),
            include_unfiled: true,
            predicate: None,
        }
    }

    /// Adds an item-level predicate; actions failing it are dropped from
    /// every traversal.
    pub fn with_predicate(mut self, predicate: impl Fn(&Action) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Whether an action takes part in the traversal: the predicate passes,
    /// its owning folder is included, and its project reference (if any) is
    /// included.
    pub fn passes(&self, action: &Action) -> bool {
        if let Some(predicate) = &self.predicate {
            if !predicate(action) {
                return false;
            }
        }
        if !self.folders.contains(&action.folder) {
            return false;
        }
        match action.project {
            Some(project_id) => self.projects.contains(&project_id),
            None => true,
        }
    }
}

/// One node of the flattened traversal.
///
/// `depth` 0 is a top-level section, 1 a nested subsection (only produced
/// by the two-level orders).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportNode<'a> {
    FolderMarker { folder: &'a Folder, depth: u8 },
    ProjectMarker { project: &'a Folder, depth: u8 },
    /// Sentinel for actions with no project reference. Emitted at most once
    /// per grouping scope, always after the project groups of that scope,
    /// and only when at least one passing action has no project.
    UnfiledMarker { depth: u8 },
    Action(&'a Action),
}

impl ExportNode<'_> {
    pub fn is_marker(&self) -> bool {
        !matches!(self, ExportNode::Action(_))
    }

    /// Nesting depth of a marker; actions report the depth of nothing.
    pub fn depth(&self) -> Option<u8> {
        match self {
            ExportNode::FolderMarker { depth, .. }
            | ExportNode::ProjectMarker { depth, .. }
            | ExportNode::UnfiledMarker { depth } => Some(*depth),
            ExportNode::Action(_) => None,
        }
    }
}

/// Single-pass iterator over the traversal nodes for one export call.
///
/// The sequence is finite, append-only, and cannot be rewound; create a new
/// iterator for every export. Every action passing the filter appears
/// exactly once regardless of the requested order. In the folder-grouped
/// orders, actions owned directly by a project folder trail the folder
/// groups under their project's own marker. Included folders and
/// projects with zero matching actions still emit their top-level marker so
/// consumers can render an explicit "no actions" placeholder; nested
/// sub-markers are only emitted for non-empty subgroups.
pub struct OrderingIter<'a> {
    queue: VecDeque<ExportNode<'a>>,
}

impl<'a> OrderingIter<'a> {
    pub fn new(model: &'a TaskModel, filter: &ExportFilter, order: ExportOrder) -> Self {
        let passing: Vec<&'a Action> = model.actions.iter().filter(|a| filter.passes(a)).collect();
        let mut queue = VecDeque::new();

        match order {
            ExportOrder::FormatSpecific | ExportOrder::Actions => {
                queue.extend(passing.iter().map(|a| ExportNode::Action(a)));
            }
            ExportOrder::FoldersActions => {
                for folder in Self::plain_folders(model, filter) {
                    queue.push_back(ExportNode::FolderMarker { folder, depth: 0 });
                    queue.extend(
                        passing
                            .iter()
                            .filter(|a| a.folder == folder.id)
                            .map(|a| ExportNode::Action(a)),
                    );
                }
                Self::push_project_owned(&mut queue, model, filter, &passing);
            }
            ExportOrder::ProjectsActions => {
                for project in Self::project_folders(model, filter) {
                    queue.push_back(ExportNode::ProjectMarker { project, depth: 0 });
                    queue.extend(
                        passing
                            .iter()
                            .filter(|a| Self::effective_project(model, a) == Some(project.id))
                            .map(|a| ExportNode::Action(a)),
                    );
                }
                Self::push_unfiled(&mut queue, filter, &passing, model, 0);
            }
            ExportOrder::FoldersProjectsActions => {
                for folder in Self::plain_folders(model, filter) {
                    queue.push_back(ExportNode::FolderMarker { folder, depth: 0 });
                    let in_folder: Vec<&'a Action> = passing
                        .iter()
                        .copied()
                        .filter(|a| a.folder == folder.id)
                        .collect();
                    for project in Self::project_folders(model, filter) {
                        let sub: Vec<&'a Action> = in_folder
                            .iter()
                            .copied()
                            .filter(|a| a.project == Some(project.id))
                            .collect();
                        if !sub.is_empty() {
                            queue.push_back(ExportNode::ProjectMarker { project, depth: 1 });
                            queue.extend(sub.into_iter().map(ExportNode::Action));
                        }
                    }
                    Self::push_unfiled(&mut queue, filter, &in_folder, model, 1);
                }
                Self::push_project_owned(&mut queue, model, filter, &passing);
            }
            ExportOrder::ProjectsFoldersActions => {
                for project in Self::project_folders(model, filter) {
                    queue.push_back(ExportNode::ProjectMarker { project, depth: 0 });
                    let of_project: Vec<&'a Action> = passing
                        .iter()
                        .copied()
                        .filter(|a| Self::effective_project(model, a) == Some(project.id))
                        .collect();
                    Self::push_folder_subgroups(&mut queue, model, &of_project);
                }
                if filter.include_unfiled {
                    let unfiled: Vec<&'a Action> = passing
                        .iter()
                        .copied()
                        .filter(|a| Self::effective_project(model, a).is_none())
                        .collect();
                    if !unfiled.is_empty() {
                        queue.push_back(ExportNode::UnfiledMarker { depth: 0 });
                        Self::push_folder_subgroups(&mut queue, model, &unfiled);
                    }
                }
            }
        }

        OrderingIter { queue }
    }

    /// Included folders that are not projects, in collection order. The role
    /// flag decides precedence: project folders never appear under folder
    /// markers.
    fn plain_folders(
        model: &'a TaskModel,
        filter: &ExportFilter,
    ) -> impl Iterator<Item = &'a Folder> {
        let included = filter.folders.clone();
        model
            .folders
            .iter()
            .filter(move |f| !f.is_project() && included.contains(&f.id))
    }

    /// Included project folders, in collection order.
    fn project_folders(
        model: &'a TaskModel,
        filter: &ExportFilter,
    ) -> impl Iterator<Item = &'a Folder> {
        let included = filter.projects.clone();
        model
            .folders
            .iter()
            .filter(move |f| f.is_project() && included.contains(&f.id))
    }

    /// Project an action is grouped under: its explicit reference, or its
    /// owning folder when that folder is itself a project.
    fn effective_project(model: &TaskModel, action: &Action) -> Option<u32> {
        action.project.or_else(|| {
            model
                .folder(action.folder)
                .filter(|f| f.is_project())
                .map(|f| f.id)
        })
    }

    /// Emits the unfiled group for the given scope: marker first, then the
    /// project-less actions, always after every project group. Nothing is
    /// emitted when the group would be empty.
    fn push_unfiled(
        queue: &mut VecDeque<ExportNode<'a>>,
        filter: &ExportFilter,
        scope: &[&'a Action],
        model: &TaskModel,
        depth: u8,
    ) {
        if !filter.include_unfiled {
            return;
        }
        let unfiled: Vec<&'a Action> = scope
            .iter()
            .copied()
            .filter(|a| Self::effective_project(model, a).is_none())
            .collect();
        if !unfiled.is_empty() {
            queue.push_back(ExportNode::UnfiledMarker { depth });
            queue.extend(unfiled.into_iter().map(ExportNode::Action));
        }
    }

    /// Trailing groups for actions owned directly by a project folder, which
    /// have no plain folder to appear under in the folder-grouped orders.
    /// Mirrors the unfiled handling: after every folder group, marker only
    /// when the group is non-empty.
    fn push_project_owned(
        queue: &mut VecDeque<ExportNode<'a>>,
        model: &'a TaskModel,
        filter: &ExportFilter,
        passing: &[&'a Action],
    ) {
        for project in Self::project_folders(model, filter) {
            let owned: Vec<&'a Action> = passing
                .iter()
                .copied()
                .filter(|a| a.folder == project.id)
                .collect();
            if !owned.is_empty() {
                queue.push_back(ExportNode::ProjectMarker { project, depth: 0 });
                queue.extend(owned.into_iter().map(ExportNode::Action));
            }
        }
    }

    /// Groups `actions` by owning folder, folders in collection order, each
    /// non-empty group behind a depth-1 folder marker.
    fn push_folder_subgroups(
        queue: &mut VecDeque<ExportNode<'a>>,
        model: &'a TaskModel,
        actions: &[&'a Action],
    ) {
        // Actions owned by a project folder have no plain folder to group
        // under; they sit directly below the enclosing marker.
        queue.extend(
            actions
                .iter()
                .copied()
                .filter(|a| model.folder(a.folder).is_some_and(|f| f.is_project()))
                .map(ExportNode::Action),
        );
        for folder in model.folders.iter().filter(|f| !f.is_project()) {
            let sub: Vec<&'a Action> = actions
                .iter()
                .copied()
                .filter(|a| a.folder == folder.id)
                .collect();
            if !sub.is_empty() {
                queue.push_back(ExportNode::FolderMarker { folder, depth: 1 });
                queue.extend(sub.into_iter().map(ExportNode::Action));
            }
        }
    }
}

impl<'a> Iterator for OrderingIter<'a> {
    type Item = ExportNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}
