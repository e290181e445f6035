//! Schedule traversal state machine.
//!
//! Owns the ordered task list and the cursor, and applies user actions
//! (complete, skip, defer, extend) deterministically. The engine is pure
//! state: recording actions against the backend is the caller's job, so
//! every transition here is synchronous and infallible once validated.

use serde::{Deserialize, Serialize};

/// A unit of study work, as returned by the scheduling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    #[serde(rename = "task_id")]
    pub id: String,

    /// Human-readable description.
    pub description: String,

    /// Planned duration in minutes. Mutated locally only by the extend
    /// action; the service may hand back fractional estimates.
    pub duration: f64,
}

impl Task {
    /// Create a new task.
    pub fn new(id: impl Into<String>, description: impl Into<String>, duration: f64) -> Self {
        Self { id: id.into(), description: description.into(), duration }
    }
}

/// Outcome recorded against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Task finished as planned.
    Complete,
    /// Task abandoned for this session.
    Skip,
    /// Task pushed to the end of the schedule.
    Defer,
    /// Task granted extra minutes, then finished.
    Extend,
}

impl TaskAction {
    /// Single-letter code used by the log endpoint.
    pub fn code(self) -> &'static str {
        match self {
            Self::Complete => "c",
            Self::Skip => "s",
            Self::Defer => "d",
            Self::Extend => "e",
        }
    }
}

/// Where the traversal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// No tasks yet; waiting for a generation request to succeed.
    Collecting,
    /// Cursor points at the current task.
    InProgress,
    /// Extend was requested; waiting for the minute amount.
    AwaitingExtendAmount,
    /// Every task has been consumed.
    Completed,
}

/// Errors from traversal operations.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("the schedule is empty")]
    EmptySchedule,

    #[error("no task is in progress")]
    NotInProgress,

    #[error("not waiting for an extend amount")]
    NotAwaitingAmount,

    #[error("enter a positive number of minutes (got {0:?})")]
    InvalidExtendAmount(String),
}

/// The traversal engine: an ordered task list, a cursor, and a state.
///
/// Invariants: the cursor is a valid index whenever the list is non-empty
/// (it stays on the last task after completion so the progress math needs
/// no special case), and defer never changes the relative order of the
/// other tasks.
#[derive(Debug)]
pub struct Traversal {
    tasks: Vec<Task>,
    cursor: usize,
    state: TraversalState,
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new()
    }
}

impl Traversal {
    /// Create an empty traversal in the `Collecting` state.
    pub fn new() -> Self {
        Self { tasks: Vec::new(), cursor: 0, state: TraversalState::Collecting }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// The full task list in its current order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Cursor position. Only meaningful while the list is non-empty.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of tasks in the schedule.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the schedule holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The task under the cursor, if one is active.
    pub fn current(&self) -> Option<&Task> {
        match self.state {
            TraversalState::InProgress | TraversalState::AwaitingExtendAmount => {
                self.tasks.get(self.cursor)
            }
            TraversalState::Collecting | TraversalState::Completed => None,
        }
    }

    /// Replace the schedule wholesale and start traversing it.
    ///
    /// An empty sequence is rejected and the engine stays in `Collecting`.
    pub fn begin(&mut self, tasks: Vec<Task>) -> Result<(), TraversalError> {
        if tasks.is_empty() {
            return Err(TraversalError::EmptySchedule);
        }
        self.tasks = tasks;
        self.cursor = 0;
        self.state = TraversalState::InProgress;
        Ok(())
    }

    /// Discard the schedule and return to `Collecting`.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.cursor = 0;
        self.state = TraversalState::Collecting;
    }

    /// Mark the current task complete and advance.
    pub fn complete(&mut self) -> Result<(), TraversalError> {
        self.require_in_progress()?;
        self.advance();
        Ok(())
    }

    /// Skip the current task and advance.
    pub fn skip(&mut self) -> Result<(), TraversalError> {
        self.require_in_progress()?;
        self.advance();
        Ok(())
    }

    /// Move the current task to the end of the schedule.
    ///
    /// The cursor does not advance: after the shift it points at what was
    /// the next task. On the last (or sole) task this is a positional no-op.
    pub fn defer(&mut self) -> Result<(), TraversalError> {
        self.require_in_progress()?;
        let task = self.tasks.remove(self.cursor);
        self.tasks.push(task);
        Ok(())
    }

    /// Ask for an extend amount for the current task.
    pub fn request_extend(&mut self) -> Result<(), TraversalError> {
        self.require_in_progress()?;
        self.state = TraversalState::AwaitingExtendAmount;
        Ok(())
    }

    /// Abandon the extend prompt and return to `InProgress` unchanged.
    pub fn cancel_extend(&mut self) -> Result<(), TraversalError> {
        if self.state != TraversalState::AwaitingExtendAmount {
            return Err(TraversalError::NotAwaitingAmount);
        }
        self.state = TraversalState::InProgress;
        Ok(())
    }

    /// Parse user input for the extend prompt.
    ///
    /// Accepts a positive integer number of minutes; anything else is an
    /// `InvalidExtendAmount` and the caller re-prompts without touching
    /// the engine.
    pub fn parse_extend_amount(input: &str) -> Result<u32, TraversalError> {
        match input.trim().parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(TraversalError::InvalidExtendAmount(input.to_string())),
        }
    }

    /// Add the validated minutes to the current task and advance.
    pub fn extend(&mut self, minutes: u32) -> Result<(), TraversalError> {
        if self.state != TraversalState::AwaitingExtendAmount {
            return Err(TraversalError::NotAwaitingAmount);
        }
        if let Some(task) = self.tasks.get_mut(self.cursor) {
            task.duration += f64::from(minutes);
        }
        self.state = TraversalState::InProgress;
        self.advance();
        Ok(())
    }

    /// Parse and apply an extend amount in one step.
    ///
    /// On invalid input nothing changes and the engine keeps waiting for
    /// a valid amount.
    pub fn submit_extend_amount(&mut self, input: &str) -> Result<u32, TraversalError> {
        if self.state != TraversalState::AwaitingExtendAmount {
            return Err(TraversalError::NotAwaitingAmount);
        }
        let minutes = Self::parse_extend_amount(input)?;
        self.extend(minutes)?;
        Ok(minutes)
    }

    /// Fraction of the schedule consumed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let consumed = self.cursor + usize::from(self.state == TraversalState::Completed);
        (consumed as f64 / self.tasks.len() as f64).clamp(0.0, 1.0)
    }

    fn require_in_progress(&self) -> Result<(), TraversalError> {
        if self.state == TraversalState::InProgress {
            Ok(())
        } else {
            Err(TraversalError::NotInProgress)
        }
    }

    fn advance(&mut self) {
        if self.cursor + 1 >= self.tasks.len() {
            // Keep the cursor on the last task.
            self.state = TraversalState::Completed;
        } else {
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tasks() -> Vec<Task> {
        vec![Task::new("1", "A", 30.0), Task::new("2", "B", 20.0)]
    }

    #[test]
    fn test_new_traversal_is_collecting() {
        let t = Traversal::new();
        assert_eq!(t.state(), TraversalState::Collecting);
        assert!(t.current().is_none());
        assert!((t.progress() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_begin_rejects_empty_schedule() {
        let mut t = Traversal::new();
        let err = t.begin(Vec::new()).unwrap_err();
        assert!(matches!(err, TraversalError::EmptySchedule));
        assert_eq!(t.state(), TraversalState::Collecting);
    }

    #[test]
    fn test_complete_visits_every_task_in_order() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        let mut visited = Vec::new();
        while t.state() == TraversalState::InProgress {
            visited.push(t.current().unwrap().description.clone());
            t.complete().unwrap();
        }

        assert_eq!(visited, vec!["A", "B"]);
        assert_eq!(t.state(), TraversalState::Completed);
        assert!((t.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_two_completes_finish_a_two_task_schedule() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        t.complete().unwrap();
        assert_eq!(t.state(), TraversalState::InProgress);
        assert_eq!(t.cursor(), 1);
        assert!((t.progress() - 0.5).abs() < f64::EPSILON);

        t.complete().unwrap();
        assert_eq!(t.state(), TraversalState::Completed);
        assert!((t.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skip_advances_like_complete() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();
        t.skip().unwrap();
        assert_eq!(t.cursor(), 1);
        t.skip().unwrap();
        assert_eq!(t.state(), TraversalState::Completed);
    }

    #[test]
    fn test_defer_moves_current_to_end() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        t.defer().unwrap();
        assert_eq!(t.state(), TraversalState::InProgress);
        assert_eq!(t.cursor(), 0);
        assert_eq!(t.current().unwrap().description, "B");
        assert_eq!(
            t.tasks().iter().map(|t| t.description.as_str()).collect::<Vec<_>>(),
            vec!["B", "A"]
        );
    }

    #[test]
    fn test_defer_preserves_relative_order_of_others() {
        let mut t = Traversal::new();
        t.begin(vec![
            Task::new("1", "A", 10.0),
            Task::new("2", "B", 10.0),
            Task::new("3", "C", 10.0),
        ])
        .unwrap();

        t.defer().unwrap();
        let order: Vec<_> = t.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_n_defers_restore_original_order() {
        let mut t = Traversal::new();
        let tasks = vec![
            Task::new("1", "A", 10.0),
            Task::new("2", "B", 10.0),
            Task::new("3", "C", 10.0),
        ];
        t.begin(tasks.clone()).unwrap();

        for _ in 0..tasks.len() {
            t.defer().unwrap();
        }

        assert_eq!(t.tasks(), tasks.as_slice());
        assert_eq!(t.cursor(), 0);
    }

    #[test]
    fn test_defer_on_sole_task_is_a_no_op() {
        let mut t = Traversal::new();
        t.begin(vec![Task::new("1", "A", 30.0)]).unwrap();

        t.defer().unwrap();
        assert_eq!(t.state(), TraversalState::InProgress);
        assert_eq!(t.cursor(), 0);
        assert_eq!(t.current().unwrap().description, "A");
    }

    #[test]
    fn test_extend_rejects_bad_input_without_mutation() {
        let mut t = Traversal::new();
        t.begin(vec![Task::new("1", "A", 30.0)]).unwrap();
        t.request_extend().unwrap();

        for input in ["-5", "abc", "0", "", "1.5"] {
            let err = t.submit_extend_amount(input).unwrap_err();
            assert!(matches!(err, TraversalError::InvalidExtendAmount(_)), "input {input:?}");
            assert_eq!(t.state(), TraversalState::AwaitingExtendAmount);
            assert!((t.tasks()[0].duration - 30.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_extend_adds_minutes_then_advances() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        t.request_extend().unwrap();
        let minutes = t.submit_extend_amount("15").unwrap();
        assert_eq!(minutes, 15);
        assert!((t.tasks()[0].duration - 45.0).abs() < f64::EPSILON);
        assert_eq!(t.state(), TraversalState::InProgress);
        assert_eq!(t.cursor(), 1);
    }

    #[test]
    fn test_extend_on_last_task_completes() {
        let mut t = Traversal::new();
        t.begin(vec![Task::new("1", "A", 30.0)]).unwrap();

        t.request_extend().unwrap();
        t.submit_extend_amount(" 10 ").unwrap();
        assert_eq!(t.state(), TraversalState::Completed);
        assert!((t.tasks()[0].duration - 40.0).abs() < f64::EPSILON);
        assert!((t.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_extend_returns_to_in_progress() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        t.request_extend().unwrap();
        t.cancel_extend().unwrap();
        assert_eq!(t.state(), TraversalState::InProgress);
        assert_eq!(t.cursor(), 0);
        assert!((t.tasks()[0].duration - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_actions_rejected_outside_in_progress() {
        let mut t = Traversal::new();
        assert!(matches!(t.complete(), Err(TraversalError::NotInProgress)));
        assert!(matches!(t.defer(), Err(TraversalError::NotInProgress)));
        assert!(matches!(t.extend(5), Err(TraversalError::NotAwaitingAmount)));

        t.begin(vec![Task::new("1", "A", 30.0)]).unwrap();
        t.complete().unwrap();
        assert!(matches!(t.skip(), Err(TraversalError::NotInProgress)));
    }

    #[test]
    fn test_defer_then_completes_scenario() {
        // [A, B] with [Defer, Complete, Complete].
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();

        t.defer().unwrap();
        assert_eq!(t.current().unwrap().description, "B");
        assert_eq!(t.cursor(), 0);

        t.complete().unwrap();
        assert_eq!(t.cursor(), 1);
        assert_eq!(t.current().unwrap().description, "A");

        t.complete().unwrap();
        assert_eq!(t.state(), TraversalState::Completed);
    }

    #[test]
    fn test_reset_returns_to_collecting() {
        let mut t = Traversal::new();
        t.begin(two_tasks()).unwrap();
        t.complete().unwrap();

        t.reset();
        assert_eq!(t.state(), TraversalState::Collecting);
        assert!(t.is_empty());
        assert!((t.progress() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(TaskAction::Complete.code(), "c");
        assert_eq!(TaskAction::Skip.code(), "s");
        assert_eq!(TaskAction::Defer.code(), "d");
        assert_eq!(TaskAction::Extend.code(), "e");
    }

    #[test]
    fn test_task_wire_names() {
        let task = Task::new("t-1", "Read chapter 4", 25.0);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["task_id"], "t-1");
        assert_eq!(json["description"], "Read chapter 4");
        assert!((json["duration"].as_f64().unwrap() - 25.0).abs() < f64::EPSILON);
    }
}
