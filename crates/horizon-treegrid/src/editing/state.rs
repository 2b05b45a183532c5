//! Editing state of one grid.
//!
//! Tracks the single user-opened cell, the values typed into editors that
//! have not been committed yet, and the unlocked cells that already closed.
//! Host commits happen elsewhere; this type only applies their outcome.

use std::collections::{HashMap, HashSet};

use horizon_treegrid_core::logging::targets;

use super::mode::{CellKey, CellMode};
use crate::model::{CellValue, EditMode, RowKey};

/// The cell opened by an explicit start-edit request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCell {
    key: CellKey,
    value: CellValue,
    session: u64,
}

impl ActiveCell {
    pub fn key(&self) -> &CellKey {
        &self.key
    }

    /// The in-progress value.
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Distinguishes successive opens of the same cell.
    pub fn session(&self) -> u64 {
        self.session
    }
}

/// Identifies a commit in flight so its outcome is applied to the right
/// editor.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitTicket {
    key: CellKey,
    mode: Option<EditMode>,
    session: Option<u64>,
    generation: u64,
}

impl CommitTicket {
    pub fn key(&self) -> &CellKey {
        &self.key
    }

    pub fn mode(&self) -> Option<EditMode> {
        self.mode
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditingState {
    active: Option<ActiveCell>,
    /// Values typed into locked and unlocked editors.
    drafts: HashMap<CellKey, CellValue>,
    auto_closed: HashSet<CellKey>,
    /// Cells whose auto-commit already fired in the current open session.
    auto_committed: HashSet<CellKey>,
    /// Bumped on every change, commit and cancel of a cell; only the outcome
    /// of the latest commit may touch the cell's draft.
    generations: HashMap<CellKey, u64>,
    next_session: u64,
}

impl EditingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveCell> {
        self.active.as_ref()
    }

    fn is_active(&self, key: &CellKey) -> bool {
        self.active.as_ref().is_some_and(|active| &active.key == key)
    }

    fn bump_generation(&mut self, key: &CellKey) -> u64 {
        let generation = self.generations.entry(key.clone()).or_default();
        *generation += 1;
        *generation
    }

    fn is_latest(&self, ticket: &CommitTicket) -> bool {
        self.generations.get(&ticket.key).copied().unwrap_or_default() == ticket.generation
    }

    pub fn is_auto_closed(&self, key: &CellKey) -> bool {
        self.auto_closed.contains(key)
    }

    pub fn auto_closed(&self) -> &HashSet<CellKey> {
        &self.auto_closed
    }

    /// What the cell shows, given its resolved edit policy.
    pub fn cell_mode(&self, key: &CellKey, mode: Option<EditMode>) -> CellMode {
        match mode {
            Some(EditMode::Locked) => CellMode::Locked,
            _ if self.is_active(key) => CellMode::UserOpen,
            Some(EditMode::Unlocked) if self.auto_closed.contains(key) => CellMode::UnlockedClosed,
            Some(EditMode::Unlocked) => CellMode::UnlockedOpen,
            None => CellMode::Off,
        }
    }

    /// The in-progress value of an open editor, if one was recorded.
    pub fn value(&self, key: &CellKey) -> Option<&CellValue> {
        match &self.active {
            Some(active) if &active.key == key => Some(&active.value),
            _ => self.drafts.get(key),
        }
    }

    /// Open `key` on request, seeded with the row's current value.
    ///
    /// Any other user-opened cell is abandoned without a commit and returned.
    pub fn start_edit(&mut self, key: CellKey, seed: CellValue) -> Option<CellKey> {
        self.next_session += 1;
        self.auto_committed.remove(&key);
        let previous = self.active.replace(ActiveCell {
            key: key.clone(),
            value: seed,
            session: self.next_session,
        });
        let abandoned = previous.map(|p| p.key).filter(|p| p != &key);
        if let Some(abandoned) = &abandoned {
            self.auto_committed.remove(abandoned);
            tracing::debug!(target: targets::EDITING, %abandoned, "edit abandoned without commit");
        }
        tracing::trace!(target: targets::EDITING, cell = %key, session = self.next_session, "edit started");
        abandoned
    }

    /// Record a change typed into an open editor.
    pub fn update_value(&mut self, key: &CellKey, value: CellValue) {
        self.bump_generation(key);
        match &mut self.active {
            Some(active) if &active.key == key => active.value = value,
            _ => {
                self.drafts.insert(key.clone(), value);
            }
        }
    }

    /// Claim the one auto-commit of the cell's current open session.
    ///
    /// Returns `false` if it was already claimed.
    pub fn claim_auto_commit(&mut self, key: &CellKey) -> bool {
        self.auto_committed.insert(key.clone())
    }

    /// Capture which editor a commit belongs to.
    ///
    /// A later change, commit or cancel of the same cell makes this ticket
    /// stale.
    pub fn begin_commit(&mut self, key: CellKey, mode: Option<EditMode>) -> CommitTicket {
        let session = self
            .active
            .as_ref()
            .filter(|active| active.key == key)
            .map(|active| active.session);
        let generation = self.bump_generation(&key);
        CommitTicket {
            key,
            mode,
            session,
            generation,
        }
    }

    /// Apply a successful commit. Returns `true` if an unlocked editor closed.
    pub fn commit_succeeded(&mut self, ticket: &CommitTicket, committed: &CellValue) -> bool {
        if ticket.mode != Some(EditMode::Locked) {
            let still_current = self
                .active
                .as_ref()
                .is_some_and(|active| active.key == ticket.key && Some(active.session) == ticket.session);
            if still_current {
                self.active = None;
            } else if ticket.session.is_some() {
                tracing::debug!(target: targets::EDITING, cell = %ticket.key, "stale commit left newer edit untouched");
            }
        }

        if self.is_latest(ticket) && self.drafts.get(&ticket.key) == Some(committed) {
            self.drafts.remove(&ticket.key);
        }

        if ticket.mode == Some(EditMode::Unlocked) {
            self.close_unlocked(&ticket.key);
            return true;
        }
        false
    }

    /// Apply a failed commit: the editor stays open holding `attempted`.
    pub fn commit_failed(&mut self, ticket: &CommitTicket, attempted: CellValue) {
        if !self.is_latest(ticket) {
            tracing::debug!(target: targets::EDITING, cell = %ticket.key, "stale commit failure ignored");
            return;
        }
        match &mut self.active {
            Some(active) if active.key == ticket.key && Some(active.session) == ticket.session => {
                active.value = attempted;
            }
            _ if ticket.session.is_none() => {
                self.drafts.insert(ticket.key.clone(), attempted);
            }
            // The user moved on; the abandoned value is not resurrected.
            _ => {}
        }
    }

    /// Cancel the cell's edit. Returns `true` if an unlocked editor closed.
    ///
    /// A locked editor cannot close; its displayed value reverts to the row's.
    pub fn cancel(&mut self, key: &CellKey, mode: Option<EditMode>) -> bool {
        self.bump_generation(key);
        self.drafts.remove(key);
        if self.is_active(key) {
            self.active = None;
        }
        self.auto_committed.remove(key);
        if mode == Some(EditMode::Locked) {
            return false;
        }
        if mode == Some(EditMode::Unlocked) {
            self.close_unlocked(key);
            return true;
        }
        false
    }

    /// Drop the user-opened cell, if any, and return its key.
    pub fn take_active(&mut self) -> Option<CellKey> {
        let active = self.active.take()?;
        self.auto_committed.remove(&active.key);
        Some(active.key)
    }

    fn close_unlocked(&mut self, key: &CellKey) {
        self.auto_closed.insert(key.clone());
        self.auto_committed.remove(key);
        tracing::trace!(target: targets::EDITING, cell = %key, "unlocked editor auto-closed");
    }

    /// Forget auto-closed cells that `still_unlocked` rejects, so they open
    /// again the next time they become unlocked. Returns the forgotten keys.
    pub fn retain_auto_closed<F>(&mut self, mut still_unlocked: F) -> Vec<CellKey>
    where
        F: FnMut(&CellKey) -> bool,
    {
        let released: Vec<CellKey> = self
            .auto_closed
            .iter()
            .filter(|key| !still_unlocked(*key))
            .cloned()
            .collect();
        for key in &released {
            self.auto_closed.remove(key);
            self.drafts.remove(key);
        }
        if !released.is_empty() {
            tracing::debug!(target: targets::EDITING, count = released.len(), "auto-closed cells released");
        }
        released
    }

    /// Drop every piece of state that refers to a row `exists` rejects.
    pub fn retain_rows<F>(&mut self, mut exists: F)
    where
        F: FnMut(&RowKey) -> bool,
    {
        if self.active.as_ref().is_some_and(|active| !exists(&active.key.row)) {
            self.active = None;
        }
        self.drafts.retain(|key, _| exists(&key.row));
        self.auto_closed.retain(|key| exists(&key.row));
        self.auto_committed.retain(|key| exists(&key.row));
        self.generations.retain(|key, _| exists(&key.row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: i64, column: &str) -> CellKey {
        CellKey::new(row, column)
    }

    #[test]
    fn test_single_user_open_cell() {
        let mut state = EditingState::new();
        assert_eq!(state.start_edit(cell(1, "name"), "a".into()), None);

        let abandoned = state.start_edit(cell(2, "name"), "b".into());
        assert_eq!(abandoned, Some(cell(1, "name")));
        assert_eq!(state.cell_mode(&cell(1, "name"), None), CellMode::Off);
        assert_eq!(state.cell_mode(&cell(2, "name"), None), CellMode::UserOpen);
        assert_eq!(state.value(&cell(2, "name")), Some(&CellValue::from("b")));
    }

    #[test]
    fn test_commit_success_closes_user_open_cell() {
        let mut state = EditingState::new();
        state.start_edit(cell(1, "name"), "a".into());
        let ticket = state.begin_commit(cell(1, "name"), None);

        assert!(!state.commit_succeeded(&ticket, &"z".into()));
        assert!(state.active().is_none());
    }

    #[test]
    fn test_stale_commit_does_not_clobber_newer_edit() {
        let mut state = EditingState::new();
        state.start_edit(cell(1, "name"), "a".into());
        let ticket = state.begin_commit(cell(1, "name"), None);

        // Same cell reopened before the commit resolved.
        state.start_edit(cell(1, "name"), "again".into());
        state.commit_succeeded(&ticket, &"a".into());
        assert_eq!(state.active().map(|a| a.key()), Some(&cell(1, "name")));

        // Another cell opened before the commit resolved.
        let ticket = state.begin_commit(cell(1, "name"), None);
        state.start_edit(cell(2, "name"), "b".into());
        state.commit_succeeded(&ticket, &"again".into());
        assert_eq!(state.active().map(|a| a.key()), Some(&cell(2, "name")));
    }

    #[test]
    fn test_commit_failure_keeps_value() {
        let mut state = EditingState::new();
        state.start_edit(cell(1, "name"), "a".into());
        state.update_value(&cell(1, "name"), "typed".into());
        let ticket = state.begin_commit(cell(1, "name"), None);

        state.commit_failed(&ticket, "typed".into());
        assert_eq!(state.cell_mode(&cell(1, "name"), None), CellMode::UserOpen);
        assert_eq!(state.value(&cell(1, "name")), Some(&CellValue::from("typed")));
    }

    #[test]
    fn test_unlocked_cell_closes_once() {
        let mut state = EditingState::new();
        let key = cell(1, "qty");
        let unlocked = Some(EditMode::Unlocked);
        assert_eq!(state.cell_mode(&key, unlocked), CellMode::UnlockedOpen);

        state.update_value(&key, 5.into());
        let ticket = state.begin_commit(key.clone(), unlocked);
        assert!(state.commit_succeeded(&ticket, &5.into()));
        assert_eq!(state.cell_mode(&key, unlocked), CellMode::UnlockedClosed);
        assert_eq!(state.value(&key), None);

        // Stays closed until released.
        assert_eq!(state.cell_mode(&key, unlocked), CellMode::UnlockedClosed);
        assert_eq!(state.retain_auto_closed(|_| false), vec![key.clone()]);
        assert_eq!(state.cell_mode(&key, unlocked), CellMode::UnlockedOpen);
    }

    #[test]
    fn test_unlocked_failed_commit_keeps_draft() {
        let mut state = EditingState::new();
        let key = cell(1, "qty");
        let ticket = state.begin_commit(key.clone(), Some(EditMode::Unlocked));
        state.commit_failed(&ticket, "oops".into());

        assert_eq!(state.cell_mode(&key, Some(EditMode::Unlocked)), CellMode::UnlockedOpen);
        assert_eq!(state.value(&key), Some(&CellValue::from("oops")));
    }

    #[test]
    fn test_cancel_locked_reverts_value() {
        let mut state = EditingState::new();
        let key = cell(1, "title");
        state.update_value(&key, "draft".into());

        assert!(!state.cancel(&key, Some(EditMode::Locked)));
        assert_eq!(state.value(&key), None);
        assert_eq!(state.cell_mode(&key, Some(EditMode::Locked)), CellMode::Locked);
    }

    #[test]
    fn test_cancel_locked_drops_user_opened_value() {
        let mut state = EditingState::new();
        let key = cell(1, "title");
        state.start_edit(key.clone(), "Write".into());
        state.update_value(&key, "typed".into());

        assert!(!state.cancel(&key, Some(EditMode::Locked)));
        assert_eq!(state.value(&key), None);
        assert!(state.active().is_none());
        assert_eq!(state.cell_mode(&key, None), CellMode::Off);
    }

    #[test]
    fn test_older_failure_after_newer_success_is_ignored() {
        let mut state = EditingState::new();
        let key = cell(1, "title");
        let locked = Some(EditMode::Locked);
        let first = state.begin_commit(key.clone(), locked);
        let second = state.begin_commit(key.clone(), locked);

        assert!(!state.commit_succeeded(&second, &"B".into()));
        state.commit_failed(&first, "A".into());
        assert_eq!(state.value(&key), None);
    }

    #[test]
    fn test_failure_after_newer_typing_keeps_typing() {
        let mut state = EditingState::new();
        let key = cell(1, "qty");
        let unlocked = Some(EditMode::Unlocked);
        state.update_value(&key, 1.into());
        let ticket = state.begin_commit(key.clone(), unlocked);
        state.update_value(&key, 2.into());

        state.commit_failed(&ticket, 1.into());
        assert_eq!(state.value(&key), Some(&CellValue::from(2)));
    }

    #[test]
    fn test_cancel_unlocked_marks_auto_closed() {
        let mut state = EditingState::new();
        let key = cell(1, "qty");
        assert!(state.cancel(&key, Some(EditMode::Unlocked)));
        assert!(state.is_auto_closed(&key));
    }

    #[test]
    fn test_reopening_closed_unlocked_cell_on_request() {
        let mut state = EditingState::new();
        let key = cell(1, "qty");
        state.cancel(&key, Some(EditMode::Unlocked));
        state.start_edit(key.clone(), 1.into());
        assert_eq!(state.cell_mode(&key, Some(EditMode::Unlocked)), CellMode::UserOpen);
    }

    #[test]
    fn test_auto_commit_is_one_shot() {
        let mut state = EditingState::new();
        let key = cell(1, "done");
        state.start_edit(key.clone(), false.into());

        assert!(state.claim_auto_commit(&key));
        assert!(!state.claim_auto_commit(&key));

        // A fresh open session re-arms it.
        state.start_edit(key.clone(), false.into());
        assert!(state.claim_auto_commit(&key));
    }

    #[test]
    fn test_retain_rows() {
        let mut state = EditingState::new();
        state.start_edit(cell(1, "name"), "a".into());
        state.cancel(&cell(2, "qty"), Some(EditMode::Unlocked));

        state.retain_rows(|row| row.as_str() != "1");
        assert!(state.active().is_none());
        assert!(state.is_auto_closed(&cell(2, "qty")));
    }
}
