//! Task extraction from the activity and custom-event logs

use crate::model::{Task, TaskId, TaskStatus};
use crate::stream::{ActivityRecord, CustomEvent, TaskFields};
use serde_json::Value;
use std::collections::BTreeMap;

/// A task-update record that passed validation
struct Candidate {
    timestamp: i64,
    task: Task,
}

impl Candidate {
    /// Whether `self` should replace `current` for the same id.
    ///
    /// The later timestamp wins. Equal timestamps fall back to comparing the
    /// task contents so the outcome never depends on input order.
    fn supersedes(&self, current: &Candidate) -> bool {
        match self.timestamp.cmp(&current.timestamp) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.content_key() > current.content_key(),
        }
    }

    fn content_key(&self) -> (&str, &str, Option<&str>, Option<&Vec<TaskId>>) {
        (
            self.task.title.as_str(),
            self.task.status.as_str(),
            self.task.owner.as_deref(),
            self.task.blocked_by.as_ref(),
        )
    }
}

/// Parse a task id sent either as an integer or a numeric string.
///
/// Anything that is not exactly an integer is rejected.
pub fn parse_task_id(raw: &Value) -> Option<TaskId> {
    match raw {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn candidate(fields: &TaskFields, fallback_title: Option<&str>, timestamp: i64) -> Option<Candidate> {
    let Some(id) = fields.task_id.as_ref().and_then(parse_task_id) else {
        tracing::trace!("Dropping task update with invalid id: {:?}", fields.task_id);
        return None;
    };

    let title = non_empty(fields.title.as_deref())
        .or_else(|| non_empty(fallback_title))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Task #{}", id));

    let status = fields
        .status
        .as_deref()
        .map(TaskStatus::from_raw)
        .unwrap_or(TaskStatus::Pending);

    let blocked_by = fields
        .blocked_by
        .as_ref()
        .map(|ids| ids.iter().filter_map(parse_task_id).collect());

    Some(Candidate {
        timestamp,
        task: Task {
            id,
            title,
            status,
            owner: fields.owner.clone(),
            blocked_by,
        },
    })
}

/// Reduce the activity and custom-event logs to one canonical task list.
///
/// At most one task per id survives: the record with the greater timestamp
/// wins outright. The result is sorted by id and independent of input order.
pub fn extract_tasks_from_stream(activities: &[ActivityRecord], custom_events: &[CustomEvent]) -> Vec<Task> {
    let mut board: BTreeMap<TaskId, Candidate> = BTreeMap::new();

    let from_activities = activities
        .iter()
        .filter(|record| record.metadata.is_task_update())
        .filter_map(|record| {
            candidate(&record.metadata.task, Some(record.message.as_str()), record.timestamp)
        });

    let from_events = custom_events.iter().filter_map(|event| {
        let fields = event.task_fields()?;
        candidate(&fields, fields.description.as_deref(), event.timestamp)
    });

    for next in from_activities.chain(from_events) {
        match board.get(&next.task.id) {
            Some(current) if !next.supersedes(current) => {}
            _ => {
                board.insert(next.task.id, next);
            }
        }
    }

    board.into_values().map(|c| c.task).collect()
}
