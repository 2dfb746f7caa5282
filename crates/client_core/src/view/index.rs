use std::collections::HashMap;

use shared::{
    domain::ViewId,
    protocol::{RepeatedView, View},
};
use tracing::debug;

use super::tree::{ViewTree, ViewTreeError};

/// Flat id-keyed store of views that resolves `belong_to_id` relations.
///
/// Entries are stored without their `belongings`; subtrees are reassembled on
/// demand by [`ViewIndex::subtree`]. Containers that are not views themselves
/// (apps, workspaces) may be referenced without being indexed.
#[derive(Debug, Default)]
pub struct ViewIndex {
    views: HashMap<ViewId, View>,
    belongings: HashMap<String, Vec<ViewId>>,
}

impl ViewIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(root: &View) -> Result<Self, ViewTreeError> {
        root.validate()?;
        let mut index = Self::new();
        for (view, _) in root.walk() {
            index.insert(view.clone())?;
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn get(&self, id: &ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn parent_of(&self, id: &ViewId) -> Option<&View> {
        let view = self.views.get(id)?;
        self.views.get(&ViewId::from(view.belong_to_id.as_str()))
    }

    /// Direct children of `belong_to_id`, in insertion order.
    pub fn belongings_of(&self, belong_to_id: &str) -> RepeatedView {
        self.belongings
            .get(belong_to_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.views.get(id).cloned())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into()
    }

    /// Adds a single view. Any `belongings` it carries are not indexed.
    pub fn insert(&mut self, mut view: View) -> Result<(), ViewTreeError> {
        if self.views.contains_key(&view.id) {
            return Err(ViewTreeError::DuplicateId(view.id));
        }
        self.check_attachment(&view.id, &view.belong_to_id)?;

        view.belongings = RepeatedView::default();
        self.belongings
            .entry(view.belong_to_id.clone())
            .or_default()
            .push(view.id.clone());
        debug!(view_id = %view.id, belong_to_id = %view.belong_to_id, "view indexed");
        self.views.insert(view.id.clone(), view);
        Ok(())
    }

    pub fn update(&mut self, mut view: View) -> Result<(), ViewTreeError> {
        let Some(current) = self.views.get(&view.id) else {
            return Err(ViewTreeError::NotFound(view.id));
        };
        if view.version < current.version {
            return Err(ViewTreeError::VersionRegression {
                id: view.id,
                current: current.version,
                proposed: view.version,
            });
        }
        let previous_parent = current.belong_to_id.clone();
        if previous_parent != view.belong_to_id {
            self.check_attachment(&view.id, &view.belong_to_id)?;
            self.detach(&view.id, &previous_parent);
            self.belongings
                .entry(view.belong_to_id.clone())
                .or_default()
                .push(view.id.clone());
        }
        view.belongings = RepeatedView::default();
        self.views.insert(view.id.clone(), view);
        Ok(())
    }

    /// Removes `id` together with everything nested under it.
    pub fn remove(&mut self, id: &ViewId) -> Option<View> {
        let view = self.views.remove(id)?;
        self.detach(id, &view.belong_to_id);

        let mut pending = self.belongings.remove(id.as_str()).unwrap_or_default();
        while let Some(child_id) = pending.pop() {
            self.views.remove(&child_id);
            if let Some(grandchildren) = self.belongings.remove(child_id.as_str()) {
                pending.extend(grandchildren);
            }
        }
        Some(view)
    }

    pub fn subtree(&self, id: &ViewId) -> Option<View> {
        let mut view = self.views.get(id)?.clone();
        view.belongings = self
            .belongings
            .get(id.as_str())
            .map(|ids| {
                ids.iter()
                    .filter_map(|child_id| self.subtree(child_id))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into();
        Some(view)
    }

    fn check_attachment(&self, id: &ViewId, belong_to_id: &str) -> Result<(), ViewTreeError> {
        if belong_to_id == id.as_str() {
            return Err(ViewTreeError::SelfParent(id.clone()));
        }
        let mut cursor = belong_to_id;
        while let Some(ancestor) = self.views.get(&ViewId::from(cursor)) {
            if &ancestor.id == id || ancestor.belong_to_id == id.as_str() {
                return Err(ViewTreeError::Cycle {
                    id: id.clone(),
                    belong_to_id: belong_to_id.to_string(),
                });
            }
            cursor = &ancestor.belong_to_id;
        }
        Ok(())
    }

    fn detach(&mut self, id: &ViewId, belong_to_id: &str) {
        if let Some(siblings) = self.belongings.get_mut(belong_to_id) {
            siblings.retain(|sibling| sibling != id);
            if siblings.is_empty() {
                self.belongings.remove(belong_to_id);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/view_index_tests.rs"]
mod tests;
