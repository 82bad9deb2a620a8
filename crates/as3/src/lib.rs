//! F5 AS3 declaration model
//!
//! Typed representation of the AS3 ("Application Services 3") documents the
//! Andromeda F5 agent posts to a BigIP device. A declaration is a three-level
//! namespace (ADC → Tenant → Application) whose leaves are GSLB entities.
//!
//! # Example
//!
//! ```
//! use as3::{Adc, Application, Entity, GslbDomain, Pointer, Tenant};
//!
//! let mut application = Application::default();
//! application.set_entity(
//!     "wideip",
//!     Entity::Domain(GslbDomain {
//!         domain_name: "www.example.com".to_string(),
//!         resource_record_type: "A".to_string(),
//!         pool_lb_mode: "global-availability".to_string(),
//!         pools: vec![Pointer::Use("pool_1".to_string())],
//!     }),
//! );
//! let mut tenant = Tenant::default();
//! tenant.add_application("application", application);
//!
//! let mut adc = Adc::new();
//! adc.add_tenant("domain_1", tenant);
//! let json = serde_json::to_string(&adc).unwrap();
//! assert!(json.contains("\"class\":\"ADC\""));
//! ```
//!
//! Serialization is deterministic: tenants, applications and entities are
//! kept in ordered maps, so the same model always yields the same bytes.

pub mod declaration;
pub mod entities;

pub use declaration::{ADC_SCHEMA_VERSION, ADC_UPDATE_MODE, Adc, Application, Tenant};
pub use entities::{
    Entity, GslbDomain, GslbMonitor, GslbPool, GslbPoolMember, GslbServer, GslbServerDevice,
    GslbVirtualServer, Pointer,
};
