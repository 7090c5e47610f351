//! Cascading dependent-selection state.
//!
//! Each management screen drives a chain of selection fields where the option
//! set of level N+1 is a function of the value chosen at level N (Department
//! -> Batch -> Roll Number). Changing a parent invalidates everything below
//! it. Fetches are tagged with a generation number at issue time and a result
//! is only installed if its tag still matches: a slow response for a parent
//! value that has since changed is dropped, no matter when it completes.

use thiserror::Error;

use crate::api::types::{BatchOption, DepartmentOption};

/// Anything that can populate a cascade level.
pub trait CascadeOption {
    fn key(&self) -> String;
    fn label(&self) -> String;
}

impl CascadeOption for DepartmentOption {
    fn key(&self) -> String {
        self.department_id.to_string()
    }

    fn label(&self) -> String {
        self.department_name.clone()
    }
}

impl CascadeOption for BatchOption {
    fn key(&self) -> String {
        self.batch_id.to_string()
    }

    fn label(&self) -> String {
        self.batch_name.clone()
    }
}

impl CascadeOption for String {
    fn key(&self) -> String {
        self.clone()
    }

    fn label(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("options are still loading, try again in a moment")]
    Pending,
    #[error("no such option: {0}")]
    UnknownKey(String),
}

/// One level of a dependent-selection chain.
#[derive(Debug, Clone)]
pub struct Cascade<T> {
    options: Vec<T>,
    selected: Option<String>,
    generation: u64,
    pending: bool,
}

impl<T> Default for Cascade<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
            generation: 0,
            pending: false,
        }
    }
}

impl<T: CascadeOption> Cascade<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a reload: drops the current options and selection, marks the
    /// level as loading, and returns the generation tag the fetch result must
    /// carry to be accepted.
    pub fn begin_reload(&mut self) -> u64 {
        self.generation += 1;
        self.pending = true;
        self.options.clear();
        self.selected = None;
        self.generation
    }

    /// Install a fetched option set. Returns false (and changes nothing) when
    /// the tag is stale, i.e. the level was reloaded or cleared again after
    /// this fetch was issued.
    pub fn apply(&mut self, generation: u64, options: Vec<T>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.options = options;
        self.pending = false;
        true
    }

    /// Empty the level without a fetch (the parent was cleared). Also bumps
    /// the generation so any in-flight fetch result is discarded.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = false;
        self.options.clear();
        self.selected = None;
    }

    /// Record a selection. Refused while a reload is pending (the field is
    /// disabled) or when the key is not in the current option set.
    pub fn select(&mut self, key: &str) -> Result<(), SelectError> {
        if self.pending {
            return Err(SelectError::Pending);
        }
        if !self.options.iter().any(|o| o.key() == key) {
            return Err(SelectError::UnknownKey(key.to_string()));
        }
        self.selected = Some(key.to_string());
        Ok(())
    }

    /// Drop the selection but keep the options (the parent did not change).
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_label(&self) -> Option<String> {
        let key = self.selected.as_deref()?;
        self.options
            .iter()
            .find(|o| o.key() == key)
            .map(|o| o.label())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Parameters of a student search, derived from a fully-selected chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentQuery {
    pub department_id: i64,
    pub batch_id: i64,
    pub roll_number: Option<String>,
}

/// The Department -> Batch -> Roll Number chain of the students screen.
///
/// Changing the department invalidates two levels (batches and rolls);
/// changing the batch invalidates only the rolls. An empty parent clears the
/// levels below it locally, with no fetch.
#[derive(Debug, Default)]
pub struct FilterChain {
    pub departments: Cascade<DepartmentOption>,
    pub batches: Cascade<BatchOption>,
    pub rolls: Cascade<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a department and return the generation tag for the batch fetch
    /// the caller must now issue.
    pub fn select_department(&mut self, key: &str) -> Result<u64, SelectError> {
        self.departments.select(key)?;
        self.rolls.clear();
        Ok(self.batches.begin_reload())
    }

    pub fn clear_department(&mut self) {
        self.departments.deselect();
        self.batches.clear();
        self.rolls.clear();
    }

    /// Select a batch and return the generation tag for the roll-number
    /// fetch.
    pub fn select_batch(&mut self, key: &str) -> Result<u64, SelectError> {
        self.batches.select(key)?;
        Ok(self.rolls.begin_reload())
    }

    pub fn clear_batch(&mut self) {
        self.batches.deselect();
        self.rolls.clear();
    }

    pub fn select_roll(&mut self, key: &str) -> Result<(), SelectError> {
        self.rolls.select(key)
    }

    pub fn clear_roll(&mut self) {
        self.rolls.deselect();
    }

    pub fn department_id(&self) -> Option<i64> {
        self.departments.selected_key()?.parse().ok()
    }

    pub fn batch_id(&self) -> Option<i64> {
        self.batches.selected_key()?.parse().ok()
    }

    /// A search is only possible once both department and batch are chosen;
    /// the roll number stays optional.
    pub fn query(&self) -> Option<StudentQuery> {
        Some(StudentQuery {
            department_id: self.department_id()?,
            batch_id: self.batch_id()?,
            roll_number: self.rolls.selected_key().map(str::to_string),
        })
    }
}
