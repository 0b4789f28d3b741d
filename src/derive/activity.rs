//! Tool call, file activity and message logs

use crate::model::{ChatMessage, FileActivity, ToolCall, ToolCallStatus};
use crate::stream::{StreamSnapshot, timestamp_to_datetime};

/// One entry per in-flight tool invocation
pub fn derive_tool_calls(snapshot: &StreamSnapshot) -> Vec<ToolCall> {
    snapshot
        .active_tool_calls
        .iter()
        .map(|(key, call)| ToolCall {
            id: if call.tool_call_id.is_empty() {
                key.clone()
            } else {
                call.tool_call_id.clone()
            },
            name: call.tool_call_name.clone(),
            args: call.args.clone(),
            status: ToolCallStatus::from_raw(&call.status),
            started_at: timestamp_to_datetime(call.timestamp),
        })
        .collect()
}

/// One entry per activity record carrying a file path, newest `max` kept
pub fn derive_file_activity(snapshot: &StreamSnapshot, max: usize) -> Vec<FileActivity> {
    let mut entries: Vec<FileActivity> = snapshot
        .activities
        .iter()
        .filter_map(|record| {
            let path = record.metadata.file_path.as_deref()?;
            if path.is_empty() {
                return None;
            }
            Some(FileActivity {
                id: record.id.clone(),
                path: path.to_string(),
                operation: record.metadata.operation.clone(),
                message: record.message.clone(),
                timestamp: timestamp_to_datetime(record.timestamp),
            })
        })
        .collect();
    keep_newest(&mut entries, max);
    entries
}

/// Settled messages in arrival order; streaming ones wait until they finish
pub fn derive_messages(snapshot: &StreamSnapshot) -> Vec<ChatMessage> {
    snapshot
        .messages
        .iter()
        .filter(|message| !message.streaming)
        .map(|message| ChatMessage {
            id: message.message_id.clone(),
            role: message.role.clone(),
            content: message.content.clone(),
            timestamp: timestamp_to_datetime(message.timestamp),
        })
        .collect()
}

/// Drop the oldest entries so at most `max` remain
pub fn keep_newest<T>(entries: &mut Vec<T>, max: usize) {
    if entries.len() > max {
        let excess = entries.len() - max;
        entries.drain(..excess);
    }
}
