//! Structural checks run on every declaration before it leaves the agent.
//!
//! A failure here is a local bug, never a device problem: the declaration
//! is dropped and nothing is posted.

use crate::reconciler::naming::{COMMON_TENANT, SHARED_APPLICATION};
use as3::{ADC_SCHEMA_VERSION, ADC_UPDATE_MODE, Adc};
use thiserror::Error;

/// A structural violation found in an assembled declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanityError {
    /// `schemaVersion` differs from the version the entities are written for
    #[error("unexpected schema version {found:?}, expected \"3.36.0\"")]
    UnexpectedSchemaVersion { found: String },

    /// `updateMode` is not `complete`, so omitted tenants would not be removed
    #[error("unexpected update mode {found:?}, expected \"complete\"")]
    UnexpectedUpdateMode { found: String },

    #[error("declaration has no Common tenant")]
    MissingCommonTenant,

    #[error("Common tenant has no Shared application")]
    MissingSharedApplication,
}

/// Check the fixed shape every declaration must have
pub fn sanity_check_declaration(adc: &Adc) -> Result<(), SanityError> {
    if adc.schema_version != ADC_SCHEMA_VERSION {
        return Err(SanityError::UnexpectedSchemaVersion {
            found: adc.schema_version.clone(),
        });
    }
    if adc.update_mode != ADC_UPDATE_MODE {
        return Err(SanityError::UnexpectedUpdateMode {
            found: adc.update_mode.clone(),
        });
    }
    let common = adc
        .tenant(COMMON_TENANT)
        .ok_or(SanityError::MissingCommonTenant)?;
    common
        .application(SHARED_APPLICATION)
        .ok_or(SanityError::MissingSharedApplication)?;
    Ok(())
}
