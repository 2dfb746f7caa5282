use std::collections::HashSet;

use shared::{domain::ViewId, protocol::View};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewTreeError {
    #[error("view id {0} appears more than once")]
    DuplicateId(ViewId),
    #[error("view {0} names itself as its container")]
    SelfParent(ViewId),
    #[error("view {id} is nested under {parent} but belongs to '{belong_to_id}'")]
    MisplacedChild {
        id: ViewId,
        parent: ViewId,
        belong_to_id: String,
    },
    #[error("attaching view {id} under '{belong_to_id}' would make it its own ancestor")]
    Cycle { id: ViewId, belong_to_id: String },
    #[error("view {0} is not indexed")]
    NotFound(ViewId),
    #[error("version of view {id} would go backwards ({current} -> {proposed})")]
    VersionRegression {
        id: ViewId,
        current: i64,
        proposed: i64,
    },
}

pub trait ViewTree {
    /// Pre-order walk yielding each node with its depth (the root is 0).
    fn walk(&self) -> Walk<'_>;

    fn find(&self, id: &ViewId) -> Option<&View> {
        self.walk().map(|(view, _)| view).find(|view| &view.id == id)
    }

    fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Checks that ids are unique across the subtree and that every child
    /// names its enclosing view in `belong_to_id`.
    fn validate(&self) -> Result<(), ViewTreeError>;
}

impl ViewTree for View {
    fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    fn validate(&self) -> Result<(), ViewTreeError> {
        let mut seen = HashSet::new();
        for (view, _) in self.walk() {
            if view.belong_to_id == view.id.0 {
                return Err(ViewTreeError::SelfParent(view.id.clone()));
            }
            if !seen.insert(&view.id) {
                return Err(ViewTreeError::DuplicateId(view.id.clone()));
            }
            if let Some(child) = view
                .belongings
                .iter()
                .find(|child| child.belong_to_id != view.id.0)
            {
                return Err(ViewTreeError::MisplacedChild {
                    id: child.id.clone(),
                    parent: view.id.clone(),
                    belong_to_id: child.belong_to_id.clone(),
                });
            }
        }
        Ok(())
    }
}

pub struct Walk<'a> {
    stack: Vec<(&'a View, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a View, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (view, depth) = self.stack.pop()?;
        self.stack
            .extend(view.belongings.iter().rev().map(|child| (child, depth + 1)));
        Some((view, depth))
    }
}

#[cfg(test)]
#[path = "../tests/view_tree_tests.rs"]
mod tests;
