//! Association resolution: human-readable references become entity handles.

use seed_core::{FieldValue, Record};
use seed_store::Store;

use crate::error::LoadError;
use crate::loader::Association;

/// Resolve every required association in declaration order.
///
/// # Errors
///
/// - `LoadError::RequiredAssociationMissing` if a field is absent or null.
/// - `LoadError::AssociationNotFound` if no entity matches.
/// - `LoadError::Store` on an ambiguous match.
pub fn resolve_required(
    store: &dyn Store,
    loader: &str,
    record: &mut Record,
    associations: &[Association],
) -> Result<(), LoadError> {
    for association in associations {
        let missing = record.get(association.field).is_none_or(FieldValue::is_null);
        if missing {
            return Err(LoadError::RequiredAssociationMissing {
                loader: loader.to_string(),
                field: association.field.to_string(),
            });
        }
        resolve_one(store, loader, record, association)?;
    }
    Ok(())
}

/// Resolve the optional associations present in `record`. A null value is
/// removed and treated as absent.
///
/// # Errors
///
/// Same as [`resolve_required`], minus the missing-field case.
pub fn resolve_optional(
    store: &dyn Store,
    loader: &str,
    record: &mut Record,
    associations: &[Association],
) -> Result<(), LoadError> {
    for association in associations {
        match record.get(association.field) {
            None => {}
            Some(value) if value.is_null() => {
                record.shift_remove(association.field);
            }
            Some(_) => resolve_one(store, loader, record, association)?,
        }
    }
    Ok(())
}

fn resolve_one(
    store: &dyn Store,
    loader: &str,
    record: &mut Record,
    association: &Association,
) -> Result<(), LoadError> {
    let Some(slot) = record.get_mut(association.field) else {
        return Ok(());
    };
    // Already resolved, e.g. by a pre-process hook.
    let FieldValue::Value(raw) = &*slot else {
        return Ok(());
    };

    let Some(found) = store.lookup(association.target, association.lookup, raw)? else {
        return Err(LoadError::AssociationNotFound {
            loader: loader.to_string(),
            field: association.field.to_string(),
            target: association.target.to_string(),
            lookup: association.lookup.to_string(),
            value: FieldValue::Value(raw.clone()).to_string(),
        });
    };
    tracing::trace!(loader, field = association.field, target = %found, "resolved association");
    *slot = FieldValue::Ref(found);
    Ok(())
}
