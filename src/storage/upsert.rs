//! Find-by-key-or-insert, then update in place.

use super::{ReadOnlyConvertible, ReadOnlyType, StorageContext, StorageError};

/// Upsert `model` into `storage` as an `E`.
///
/// Loads the entity with the model's primary key or starts a new one,
/// overwrites it with the model and stages it. Last write wins on the whole
/// entity. The caller saves.
pub fn upsert<E: ReadOnlyConvertible>(
    storage: &StorageContext,
    model: &E::ReadOnly,
) -> Result<E, StorageError> {
    let key = ReadOnlyType::primary_key(model);
    let mut entity = match storage.load_object::<E>(key)? {
        Some(existing) => existing,
        None => storage.insert_new_object::<E>(),
    };

    entity.update_with(model);
    debug_assert_eq!(
        entity.primary_key(),
        key,
        "update_with must copy the primary key of {}",
        E::ENTITY_NAME
    );

    storage.stage(&entity)?;
    Ok(entity)
}

/// Upsert every model in order.
pub fn upsert_all<E: ReadOnlyConvertible>(
    storage: &StorageContext,
    models: &[E::ReadOnly],
) -> Result<Vec<E>, StorageError> {
    models.iter().map(|model| upsert::<E>(storage, model)).collect()
}
