//! Attention focus (C10).

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{AttentionFocus, FocusType, TransitionType};
use chrono::Utc;
use uuid::Uuid;

/// Manages attention focus on top of a [`StoreKernel`].
pub struct AttentionManager<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> AttentionManager<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// Set a new primary focus, ending the previous primary first (§5:
    /// readers never observe two concurrent primaries).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn set_attention_focus(
        &self,
        project_id: &str,
        focus_target: &str,
        focus_type: FocusType,
    ) -> Result<AttentionFocus> {
        let previous = if focus_type == FocusType::Primary {
            self.store.end_primary_focus(project_id).await?;
            self.store
                .get_active_focuses(project_id)
                .await?
                .into_iter()
                .find(|f| f.focus_type == FocusType::Primary)
                .map(|f| f.id)
        } else {
            None
        };

        let focus = AttentionFocus {
            id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            focus_target: focus_target.to_string(),
            focus_type,
            weight: 1.0,
            started_at: Utc::now(),
            ended_at: None,
            transition_type: if previous.is_some() {
                TransitionType::Manual
            } else {
                TransitionType::Initial
            },
            previous_focus_id: previous,
        };
        self.store.upsert_attention_focus(&focus).await?;
        Ok(focus)
    }

    /// Focus the top `n` candidate targets from `ranked` (already sorted
    /// descending by saliency), with weight decaying by rank:
    /// `max(0.3, 1 − 0.1·rank)` (§4.10).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn auto_focus_top_memories(
        &self,
        project_id: &str,
        ranked: &[(String, FocusType)],
        n: usize,
    ) -> Result<Vec<AttentionFocus>> {
        let mut out = Vec::new();
        for (rank, (target, focus_type)) in ranked.iter().take(n).enumerate() {
            let weight = (1.0 - 0.1 * rank as f32).max(0.3);
            let focus = AttentionFocus {
                id: Uuid::new_v4(),
                project_id: project_id.to_string(),
                focus_target: target.clone(),
                focus_type: *focus_type,
                weight,
                started_at: Utc::now(),
                ended_at: None,
                transition_type: TransitionType::AutoFocus,
                previous_focus_id: None,
            };
            self.store.upsert_attention_focus(&focus).await?;
            out.push(focus);
        }
        Ok(out)
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_active_focuses(&self, project_id: &str) -> Result<Vec<AttentionFocus>> {
        self.store.get_active_focuses(project_id).await
    }
}
