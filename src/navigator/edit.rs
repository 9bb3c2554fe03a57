//! Structural edits
//!
//! Inserts and removals keep the active path, the focal parent and the
//! ledger consistent. New nodes enter with zero geometry; their real sizes
//! arrive later through the resize notifications.

use tracing::debug;

use super::Navigator;
use crate::definition::NodeDefinition;
use crate::tree::NodeId;
use crate::NavError;

impl Navigator {
    /// Insert subtrees as children of `parent`, starting at `index`
    ///
    /// Identifiers are checked before anything changes, so a rejected batch
    /// leaves the tree untouched. Returns the handles of the new children.
    pub fn insert_children(
        &mut self,
        parent: NodeId,
        index: usize,
        definitions: &[NodeDefinition],
    ) -> Result<Vec<NodeId>, NavError> {
        let node = self.tree.get(parent).ok_or(NavError::UnknownNode)?;
        let len = node.children().len();
        if index > len {
            return Err(NavError::IndexOutOfRange { index, len });
        }
        self.tree.validate_definitions(definitions)?;
        if definitions.is_empty() {
            return Ok(Vec::new());
        }
        let active_before = node.active_child_index();

        self.begin_op();
        self.pan_cancel();

        let mut inserted = Vec::with_capacity(definitions.len());
        for (offset, definition) in definitions.iter().enumerate() {
            let id = self.tree.insert_subtree(parent, index + offset, definition);
            self.ledger.seed(&self.tree, id);
            inserted.push(id);
        }

        match active_before {
            None => {
                self.set_active_index(parent, 0);
                self.align_branch_to_index(parent, 0);
            }
            Some(active) if index <= active => {
                self.set_active_index(parent, active + inserted.len());
            }
            Some(_) => {}
        }
        self.reveal_if_active(parent);

        debug!(
            parent = self.tree.node(parent).id(),
            index,
            count = inserted.len(),
            "children inserted"
        );
        self.finish_op();
        Ok(inserted)
    }

    /// Remove `count` children of `parent` starting at `index`
    ///
    /// Returns the definitions of the removed subtrees in their original
    /// order. If the focal parent was removed, focus falls back to `parent`,
    /// or to its parent when `parent` is left without children.
    pub fn remove_children(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Result<Vec<NodeDefinition>, NavError> {
        let node = self.tree.get(parent).ok_or(NavError::UnknownNode)?;
        let len = node.children().len();
        let end = index
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(NavError::IndexOutOfRange {
                index: index.saturating_add(count),
                len,
            })?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let active_before = node.active_child_index();
        let doomed: Vec<NodeId> = node.children()[index..end].to_vec();

        self.begin_op();
        self.pan_cancel();

        if let Some(inspected) = self.inspected {
            if doomed
                .iter()
                .any(|&child| self.tree.is_ancestor_or_self(child, inspected))
            {
                self.exit_inspect_mode();
            }
        }
        let focal_removed = doomed
            .iter()
            .any(|&child| self.tree.is_ancestor_or_self(child, self.focal_parent));

        let mut removed = Vec::with_capacity(count);
        for &child in doomed.iter().rev() {
            self.align_before_node_delete(child);
            let (definition, freed) = self.tree.detach_subtree(child);
            for id in freed {
                self.ledger.remove(id);
            }
            removed.push(definition);
        }
        removed.reverse();

        let new_len = len - count;
        let active_after = match active_before {
            _ if new_len == 0 => None,
            Some(active) if active < index => Some(active),
            Some(active) if active >= end => Some(active - count),
            Some(_) => Some(index.min(new_len - 1)),
            None => None,
        };
        let active_removed = matches!(active_before, Some(active) if (index..end).contains(&active));
        self.tree.node_mut(parent).active_child_index = active_after;

        let refocus = (focal_removed || (new_len == 0 && parent == self.focal_parent)).then(|| {
            if new_len > 0 {
                parent
            } else {
                self.tree.node(parent).parent().unwrap_or(parent)
            }
        });
        if let Some(fallback) = refocus {
            self.set_focal_parent(fallback);
        }

        match active_after {
            Some(active) if active_removed => self.align_branch_to_index(parent, active),
            Some(_) => {}
            None => {
                let entry = self.ledger.entry_mut(parent);
                entry.child_branch_offset = 0.0;
                entry.child_branch_offset_aligned = 0.0;
                self.align_on_branch_resize(parent, 0.0);
                self.tree.node_mut(parent).is_children_visible = false;
            }
        }

        if let Some(fallback) = refocus {
            self.align_trunk_to_branch(fallback);
        }
        self.reveal_if_active(parent);

        debug!(
            parent = self.tree.node(parent).id(),
            index,
            count,
            "children removed"
        );
        self.finish_op();
        Ok(removed)
    }

    /// Re-show the active subtree below `parent` if it sits within the
    /// visible part of the active path
    fn reveal_if_active(&mut self, parent: NodeId) {
        let limit = self.tree.node(self.focal_parent).level() + self.config.visible_subtree_depth;
        if self.tree.node(parent).level() > limit || !self.is_on_active_path(parent) {
            return;
        }
        let depth = self.visible_depth_from(parent);
        self.show_active_subtree(parent, depth);
    }

    fn is_on_active_path(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.tree.node(current).parent() {
            if self.tree.active_child(parent) != Some(current) {
                return false;
            }
            current = parent;
        }
        true
    }
}
