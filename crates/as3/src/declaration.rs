//! ADC, Tenant and Application containers
//!
//! AS3 mixes fixed attributes (`class`, `label`, ...) and user-named children
//! in the same JSON object, so these containers serialize themselves as flat
//! maps instead of deriving `Serialize`.

use crate::entities::Entity;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// AS3 schema version every declaration is written against
pub const ADC_SCHEMA_VERSION: &str = "3.36.0";

/// AS3 update mode: tenants missing from the declaration are removed
pub const ADC_UPDATE_MODE: &str = "complete";

/// Root of an AS3 declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Adc {
    pub schema_version: String,
    pub update_mode: String,
    pub id: String,
    tenants: BTreeMap<String, Tenant>,
}

impl Adc {
    /// Create an empty declaration with the fixed schema version and update mode
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_version: ADC_SCHEMA_VERSION.to_string(),
            update_mode: ADC_UPDATE_MODE.to_string(),
            id: String::new(),
            tenants: BTreeMap::new(),
        }
    }

    /// Add (or replace) a tenant
    pub fn add_tenant(&mut self, name: impl Into<String>, tenant: Tenant) {
        self.tenants.insert(name.into(), tenant);
    }

    /// Look up a tenant by name
    #[must_use]
    pub fn tenant(&self, name: &str) -> Option<&Tenant> {
        self.tenants.get(name)
    }

    /// Iterate over tenants in name order
    pub fn tenants(&self) -> impl Iterator<Item = (&str, &Tenant)> {
        self.tenants.iter().map(|(name, tenant)| (name.as_str(), tenant))
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Adc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.tenants.len()))?;
        map.serialize_entry("class", "ADC")?;
        map.serialize_entry("schemaVersion", &self.schema_version)?;
        map.serialize_entry("updateMode", &self.update_mode)?;
        map.serialize_entry("id", &self.id)?;
        for (name, tenant) in &self.tenants {
            map.serialize_entry(name, tenant)?;
        }
        map.end()
    }
}

/// AS3 tenant (a BigIP partition)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tenant {
    pub label: String,
    pub remark: String,
    applications: BTreeMap<String, Application>,
}

impl Tenant {
    /// Add (or replace) an application
    pub fn add_application(&mut self, name: impl Into<String>, application: Application) {
        self.applications.insert(name.into(), application);
    }

    /// Look up an application by name
    #[must_use]
    pub fn application(&self, name: &str) -> Option<&Application> {
        self.applications.get(name)
    }

    /// Iterate over applications in name order
    pub fn applications(&self) -> impl Iterator<Item = (&str, &Application)> {
        self.applications
            .iter()
            .map(|(name, application)| (name.as_str(), application))
    }
}

impl Serialize for Tenant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.applications.len()))?;
        map.serialize_entry("class", "Tenant")?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("remark", &self.remark)?;
        for (name, application) in &self.applications {
            map.serialize_entry(name, application)?;
        }
        map.end()
    }
}

/// AS3 application holding GSLB entities by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Application {
    pub label: String,
    pub remark: String,
    pub template: String,
    entities: BTreeMap<String, Entity>,
}

impl Application {
    /// Create an empty application using the given AS3 template
    #[must_use]
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// Insert an entity, returning the one previously stored under `key`
    pub fn set_entity(&mut self, key: impl Into<String>, entity: Entity) -> Option<Entity> {
        self.entities.insert(key.into(), entity)
    }

    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn entity_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Iterate over entities in key order
    pub fn entities(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(key, entity)| (key.as_str(), entity))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Serialize for Application {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.entities.len()))?;
        map.serialize_entry("class", "Application")?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("remark", &self.remark)?;
        map.serialize_entry("template", &self.template)?;
        for (key, entity) in &self.entities {
            map.serialize_entry(key, entity)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GslbPool, Pointer};
    use serde_json::json;

    #[test]
    fn test_empty_common_declaration_shape() {
        let mut tenant = Tenant::default();
        tenant.add_application("Shared", Application::with_template("shared"));
        let mut adc = Adc::new();
        adc.add_tenant("Common", tenant);

        let value = serde_json::to_value(&adc).unwrap();
        assert_eq!(
            value,
            json!({
                "class": "ADC",
                "schemaVersion": "3.36.0",
                "updateMode": "complete",
                "id": "",
                "Common": {
                    "class": "Tenant",
                    "label": "",
                    "remark": "",
                    "Shared": {
                        "class": "Application",
                        "label": "",
                        "remark": "",
                        "template": "shared"
                    }
                }
            })
        );
    }

    #[test]
    fn test_serialization_is_ordered_by_key() {
        let mut a = Application::default();
        a.set_entity("pool_b", Entity::Pool(GslbPool::default()));
        a.set_entity("pool_a", Entity::Pool(GslbPool::default()));

        let mut b = Application::default();
        b.set_entity("pool_a", Entity::Pool(GslbPool::default()));
        b.set_entity("pool_b", Entity::Pool(GslbPool::default()));

        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        assert_eq!(a_json, b_json);
        assert!(a_json.find("pool_a").unwrap() < a_json.find("pool_b").unwrap());
    }

    #[test]
    fn test_set_entity_replaces_and_returns_previous() {
        let mut application = Application::default();
        assert!(application
            .set_entity("pool_1", Entity::Pool(GslbPool::default()))
            .is_none());

        let updated = GslbPool {
            members: vec![],
            lb_mode_preferred: "round-robin".to_string(),
            ..GslbPool::default()
        };
        let previous = application.set_entity("pool_1", Entity::Pool(updated.clone()));
        assert_eq!(previous, Some(Entity::Pool(GslbPool::default())));
        assert_eq!(application.entity("pool_1"), Some(&Entity::Pool(updated)));
        assert_eq!(application.len(), 1);
    }

    #[test]
    fn test_lookup_helpers() {
        let mut application = Application::default();
        application.set_entity(
            "wideip",
            Entity::Domain(crate::entities::GslbDomain {
                pools: vec![Pointer::Use("pool_1".to_string())],
                ..Default::default()
            }),
        );
        let mut tenant = Tenant::default();
        tenant.add_application("application", application);
        let mut adc = Adc::new();
        adc.add_tenant("domain_1", tenant);

        assert!(adc.tenant("Common").is_none());
        let tenant = adc.tenant("domain_1").unwrap();
        assert!(tenant.application("Shared").is_none());
        let names: Vec<&str> = tenant.applications().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["application"]);
        let application = tenant.application("application").unwrap();
        assert!(application.entity("wideip").is_some());
        assert_eq!(adc.tenants().count(), 1);
    }
}
