// SPDX-License-Identifier: Apache-2.0

use crate::persist::{load_types, save_types};
use crate::EngineError;
use foreman_model::{
    CodeLabel, CompletionField, CompletionMethod, DismissalCodes, Priority, TodoType, TypeId,
};
use foreman_store::StorageGateway;
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Client-supplied todo-type fields. Everything is optional so the same
/// shape serves create (with required-field checks) and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoTypeDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub completion_method: Option<String>,
    pub completion_fields: Option<Vec<CompletionField>>,
    pub dismissal_codes: Option<DismissalCodes>,
    pub completion_codes: Option<Vec<CodeLabel>>,
    pub notes: Option<String>,
}

/// Validated CRUD over todo types. Type ids are immutable once created.
pub struct TypeRegistry {
    store: Arc<dyn StorageGateway>,
    write_lock: Mutex<()>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn StorageGateway>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn list(&self) -> Result<Vec<TodoType>, EngineError> {
        load_types(self.store.as_ref())
    }

    pub fn get(&self, type_id: &str) -> Result<TodoType, EngineError> {
        let types = load_types(self.store.as_ref())?;
        types
            .into_iter()
            .find(|t| t.id.as_str() == type_id)
            .ok_or_else(|| EngineError::NotFound("Todo type not found".to_string()))
    }

    pub fn create(&self, draft: TodoTypeDraft) -> Result<TodoType, EngineError> {
        let (Some(id), Some(name)) = (
            draft.id.as_deref().filter(|s| !s.is_empty()),
            draft.name.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(EngineError::Validation(
                "id and name are required".to_string(),
            ));
        };
        let id = TypeId::parse(id).map_err(|e| EngineError::Validation(e.to_string()))?;
        let priority = validate_priority(draft.priority)?.unwrap_or_default();
        let completion_method = validate_method(draft.completion_method.as_deref())?
            .unwrap_or_default();
        let completion_codes = draft.completion_codes.filter(|codes| !codes.is_empty());
        require_dropdown_codes(completion_method, completion_codes.as_deref())?;

        let _guard = self.guard();
        let mut types = load_types(self.store.as_ref())?;
        if types.iter().any(|t| t.id == id) {
            return Err(EngineError::Validation(
                "Todo type with this id already exists".to_string(),
            ));
        }

        let todo_type = TodoType {
            id,
            name: name.to_string(),
            priority,
            completion_method,
            completion_fields: draft.completion_fields.unwrap_or_default(),
            dismissal_codes: draft
                .dismissal_codes
                .map(DismissalCodes::normalized)
                .unwrap_or_default(),
            completion_codes,
            notes: draft.notes,
        };
        types.push(todo_type.clone());
        save_types(self.store.as_ref(), &types)?;
        info!(type_id = %todo_type.id, "todo type created");
        Ok(todo_type)
    }

    /// Partial merge: only provided fields overwrite. The id itself is not
    /// patchable.
    pub fn update(&self, type_id: &str, draft: TodoTypeDraft) -> Result<TodoType, EngineError> {
        let priority = validate_priority(draft.priority)?;
        let completion_method = validate_method(draft.completion_method.as_deref())?;

        let _guard = self.guard();
        let mut types = load_types(self.store.as_ref())?;
        let existing = types
            .iter_mut()
            .find(|t| t.id.as_str() == type_id)
            .ok_or_else(|| EngineError::NotFound("Todo type not found".to_string()))?;

        if let Some(name) = draft.name {
            existing.name = name;
        }
        if let Some(priority) = priority {
            existing.priority = priority;
        }
        if let Some(method) = completion_method {
            existing.completion_method = method;
        }
        if let Some(fields) = draft.completion_fields {
            existing.completion_fields = fields;
        }
        if let Some(codes) = draft.dismissal_codes {
            existing.dismissal_codes = codes.normalized();
        }
        if let Some(codes) = draft.completion_codes {
            existing.completion_codes = Some(codes).filter(|c| !c.is_empty());
        }
        if let Some(notes) = draft.notes {
            existing.notes = Some(notes);
        }
        require_dropdown_codes(
            existing.completion_method,
            existing.completion_codes.as_deref(),
        )?;

        let updated = existing.clone();
        save_types(self.store.as_ref(), &types)?;
        info!(type_id, "todo type updated");
        Ok(updated)
    }

    pub fn delete(&self, type_id: &str) -> Result<(), EngineError> {
        let _guard = self.guard();
        let mut types = load_types(self.store.as_ref())?;
        let before = types.len();
        types.retain(|t| t.id.as_str() != type_id);
        if types.len() == before {
            return Err(EngineError::NotFound("Todo type not found".to_string()));
        }
        save_types(self.store.as_ref(), &types)?;
        info!(type_id, "todo type deleted");
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_priority(raw: Option<i64>) -> Result<Option<Priority>, EngineError> {
    match raw {
        None => Ok(None),
        Some(p) if (1..=4).contains(&p) => Ok(Some(
            Priority::new(p as u8).map_err(EngineError::Validation)?,
        )),
        Some(_) => Err(EngineError::Validation(
            "priority must be between 1 and 4".to_string(),
        )),
    }
}

fn validate_method(raw: Option<&str>) -> Result<Option<CompletionMethod>, EngineError> {
    raw.map(|s| CompletionMethod::parse(s).map_err(EngineError::Validation))
        .transpose()
}

fn require_dropdown_codes(
    method: CompletionMethod,
    codes: Option<&[CodeLabel]>,
) -> Result<(), EngineError> {
    if method == CompletionMethod::Dropdown && codes.map_or(true, <[CodeLabel]>::is_empty) {
        return Err(EngineError::Validation(
            "completionCodes are required when completionMethod is dropdown".to_string(),
        ));
    }
    Ok(())
}
