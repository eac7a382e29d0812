// SPDX-License-Identifier: Apache-2.0

use crate::EngineError;
use foreman_model::{Todo, TodoType};
use foreman_store::{decode_records, encode_records, Collection, StorageGateway};

pub(crate) fn load_todos(store: &dyn StorageGateway) -> Result<Vec<Todo>, EngineError> {
    let raw = store.read(Collection::Todos)?;
    Ok(decode_records(Collection::Todos, raw)?)
}

pub(crate) fn save_todos(store: &dyn StorageGateway, todos: &[Todo]) -> Result<(), EngineError> {
    let raw = encode_records(todos)?;
    store.write(Collection::Todos, &raw)?;
    Ok(())
}

pub(crate) fn load_types(store: &dyn StorageGateway) -> Result<Vec<TodoType>, EngineError> {
    let raw = store.read(Collection::TodoTypes)?;
    Ok(decode_records(Collection::TodoTypes, raw)?)
}

pub(crate) fn save_types(store: &dyn StorageGateway, types: &[TodoType]) -> Result<(), EngineError> {
    let raw = encode_records(types)?;
    store.write(Collection::TodoTypes, &raw)?;
    Ok(())
}
