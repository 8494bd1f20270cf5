//! Edit buffer: provisional, possibly unsaved values for the active agent.

use crate::agent::domain::AgentConfig;
use crate::types::AgentId;

/// Draft values for exactly one agent.
///
/// The buffer is tagged with the agent it belongs to. Identity fields
/// (`agent_id`, `created_at`, `is_default`) are pinned to the stored values and
/// cannot be changed through edits.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    baseline: Option<AgentConfig>,
    draft: Option<AgentConfig>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agent the buffer currently belongs to
    pub fn owner(&self) -> Option<&str> {
        self.baseline.as_ref().map(|c| c.agent_id.as_str())
    }

    /// Reset to the stored values of `stored`.
    pub fn reset_from(&mut self, stored: &AgentConfig) {
        self.baseline = Some(stored.clone());
        self.draft = Some(stored.clone());
    }

    /// Record that `sent` was saved as `saved`.
    ///
    /// Edits made after `sent` was taken are kept on top of the new baseline.
    pub fn settle(&mut self, sent: &AgentConfig, saved: &AgentConfig) {
        if self.draft.as_ref() == Some(sent) {
            self.reset_from(saved);
        } else {
            self.baseline = Some(saved.clone());
        }
    }

    /// Forget everything; used when nothing is selected.
    pub fn clear(&mut self) {
        self.baseline = None;
        self.draft = None;
    }

    /// Current draft values
    pub fn values(&self) -> Option<&AgentConfig> {
        self.draft.as_ref()
    }

    /// Whether the draft differs from the stored values
    pub fn is_dirty(&self) -> bool {
        self.baseline != self.draft
    }

    /// Apply an edit to the draft. Returns false when the buffer is empty.
    pub fn edit<F>(&mut self, apply: F) -> bool
    where
        F: FnOnce(&mut AgentConfig),
    {
        let (Some(baseline), Some(draft)) = (self.baseline.as_ref(), self.draft.as_mut()) else {
            return false;
        };
        apply(draft);
        draft.agent_id = baseline.agent_id.clone();
        draft.created_at = baseline.created_at;
        draft.is_default = baseline.is_default;
        true
    }

    /// Owner and draft values, ready to be saved.
    pub fn pending_save(&self) -> Option<(AgentId, AgentConfig)> {
        let draft = self.draft.as_ref()?;
        Some((draft.agent_id.clone(), draft.clone()))
    }
}
