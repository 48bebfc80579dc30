//! # seed-store
//!
//! The host store contract the loading engine runs against, and
//! [`MemoryStore`], an in-process implementation that snapshots to JSON Lines.
//!
//! The engine never touches storage directly. Everything it needs is on the
//! [`Store`] trait: atomic find-or-create keyed by identity fields, lookup by a
//! single field for association resolution, persistence of a mutated entity,
//! and the custom field registry query.

pub mod entity;
pub mod error;
pub mod memory;
pub mod snapshot;

pub use entity::Entity;
pub use error::StoreError;
pub use memory::MemoryStore;

use serde_json::Value;

use seed_core::{EntityId, EntityRef, Record};

/// Entity type under which custom field descriptors are stored.
pub const CUSTOM_FIELD_TYPE: &str = "CustomField";

/// Field of a custom field descriptor listing the entity types it applies to.
pub const CUSTOM_FIELD_TARGETS: &str = "on_objects";

/// Registration state of a custom field key for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFieldStatus {
    /// No descriptor with this key exists.
    Unknown,
    /// The descriptor exists but does not apply to the entity type.
    Disabled,
    Enabled,
}

/// Storage operations required by the loading engine.
///
/// Every call is atomic and durable on return from the caller's point of view.
/// There is a single writer per run, so no locking discipline is implied.
pub trait Store {
    /// Find the entity of `entity_type` whose fields equal every entry of
    /// `identity`, or create one from `identity` followed by `defaults`.
    ///
    /// Returns the entity and whether it was created. `defaults` are ignored
    /// when an entity already exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Ambiguous` if more than one entity matches.
    fn find_or_create(
        &mut self,
        entity_type: &str,
        identity: &Record,
        defaults: Record,
    ) -> Result<(Entity, bool), StoreError>;

    /// Find the entity of `entity_type` whose fields equal every entry of
    /// `identity`, without creating one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Ambiguous` if more than one entity matches.
    fn find(&self, entity_type: &str, identity: &Record) -> Result<Option<Entity>, StoreError>;

    /// Find the single entity of `entity_type` whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Ambiguous` if more than one entity matches.
    fn lookup(
        &self,
        entity_type: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<EntityRef>, StoreError>;

    /// Fetch an entity by id.
    ///
    /// # Errors
    ///
    /// Implementations backed by I/O may fail; `MemoryStore` never does.
    fn get(&self, id: EntityId) -> Result<Option<Entity>, StoreError>;

    /// Write back an entity previously returned by this store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entity no longer exists.
    fn persist(&mut self, entity: &Entity) -> Result<(), StoreError>;

    /// Whether custom field `key` is registered, and enabled for `entity_type`.
    ///
    /// # Errors
    ///
    /// Implementations backed by I/O may fail; `MemoryStore` never does.
    fn custom_field_status(
        &self,
        key: &str,
        entity_type: &str,
    ) -> Result<CustomFieldStatus, StoreError>;
}
