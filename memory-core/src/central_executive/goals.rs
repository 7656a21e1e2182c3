//! Goal hierarchy (C10).

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{Goal, GoalStatus};
use std::collections::HashMap;
use uuid::Uuid;

/// Manages the goal hierarchy on top of a [`StoreKernel`].
pub struct GoalManager<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> GoalManager<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn set_goal(&self, goal: &Goal) -> Result<()> {
        self.store.upsert_goal(goal).await
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_active_goals(&self, project_id: &str) -> Result<Vec<Goal>> {
        self.store.get_active_goals(project_id).await
    }

    /// Update `id`'s progress; a progress of `1.0` auto-completes the goal.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if `id` doesn't exist,
    /// otherwise an error if the write fails.
    pub async fn update_goal_progress(&self, id: Uuid, progress: f32) -> Result<()> {
        let mut goal = self
            .store
            .get_goal(id)
            .await?
            .ok_or(crate::error::Error::NotFound(id))?;
        goal.progress = progress.clamp(0.0, 1.0);
        if (goal.progress - 1.0).abs() < f32::EPSILON {
            goal.status = GoalStatus::Completed;
        }
        self.store.upsert_goal(&goal).await
    }

    /// Complete `id` and cascade completion to all descendant goals.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if `id` doesn't exist,
    /// otherwise an error if the write fails.
    pub async fn complete_goal(&self, project_id: &str, id: Uuid) -> Result<()> {
        let mut goal = self
            .store
            .get_goal(id)
            .await?
            .ok_or(crate::error::Error::NotFound(id))?;
        goal.status = GoalStatus::Completed;
        goal.progress = 1.0;
        self.store.upsert_goal(&goal).await?;

        let mut stack = vec![id];
        while let Some(parent) = stack.pop() {
            for mut child in self.store.get_child_goals(project_id, Some(parent)).await? {
                if child.status != GoalStatus::Completed {
                    child.status = GoalStatus::Completed;
                    child.progress = 1.0;
                    self.store.upsert_goal(&child).await?;
                }
                stack.push(child.id);
            }
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if `id` doesn't exist,
    /// otherwise an error if the write fails.
    pub async fn suspend_goal(&self, id: Uuid) -> Result<()> {
        self.set_status(id, GoalStatus::Suspended).await
    }

    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if `id` doesn't exist,
    /// otherwise an error if the write fails.
    pub async fn resume_goal(&self, id: Uuid) -> Result<()> {
        self.set_status(id, GoalStatus::Active).await
    }

    async fn set_status(&self, id: Uuid, status: GoalStatus) -> Result<()> {
        let mut goal = self
            .store
            .get_goal(id)
            .await?
            .ok_or(crate::error::Error::NotFound(id))?;
        goal.status = status;
        self.store.upsert_goal(&goal).await
    }

    /// Breadth-first map from goal id to its direct children, rooted at
    /// `root` (or every top-level goal when `root` is `None`).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_goal_hierarchy(
        &self,
        project_id: &str,
        root: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<Goal>>> {
        let mut hierarchy = HashMap::new();
        let mut queue = vec![root];
        while let Some(parent) = queue.pop() {
            let children = self.store.get_child_goals(project_id, parent).await?;
            if let Some(parent_id) = parent {
                for child in &children {
                    queue.push(Some(child.id));
                }
                hierarchy.insert(parent_id, children);
            } else {
                for child in &children {
                    queue.push(Some(child.id));
                }
            }
        }
        Ok(hierarchy)
    }
}
