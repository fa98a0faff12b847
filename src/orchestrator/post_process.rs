//! Post-generation processing.
//!
//! Persists a successful generation. Persistence is independent of generation: a failed save is
//! reported but never takes back what is already on screen.

use crate::error::WorkflowError;
use crate::model::{GenerationResult, HistoryRecord, PlatformFormat};
use crate::storage::{HistoryStore, NewRecord};

/// Append the generated content to the owner's history.
pub(crate) async fn persist_generation(
    store: &dyn HistoryStore,
    owner_id: &str,
    prompt: &str,
    format: PlatformFormat,
    result: &GenerationResult,
) -> Result<HistoryRecord, WorkflowError> {
    let new = NewRecord {
        owner_id: owner_id.to_string(),
        content: result.content_text(),
        prompt: prompt.to_string(),
        format,
    };
    store.append(new).await.map_err(|e| {
        tracing::warn!(owner = owner_id, error = %e, "failed to save generated content");
        WorkflowError::Save(e.to_string())
    })
}
