mod storage_entity;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(StorageEntity)]
// ============================================================================

/// Derive macro for storage entities.
///
/// Generates `mate_stores::StorageEntity` with the table name and primary key
/// accessor.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Default, Serialize, Deserialize, StorageEntity)]
/// #[entity(name = "Account")]
/// pub struct StorageAccount {
///     #[entity(key)]
///     pub id: i64,
///     pub username: String,
/// }
/// ```
///
/// The table name defaults to the struct name without a leading `Storage`
/// (`StorageAccount` -> `"Account"`). The key defaults to a field named `id`.
#[proc_macro_derive(StorageEntity, attributes(entity))]
pub fn derive_storage_entity(input: TokenStream) -> TokenStream {
    storage_entity::derive_storage_entity(input)
}
