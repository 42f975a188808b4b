//! Adapter from raw cluster objects to the fields the engine reads
//!
//! Everything the topology engine needs from an object (identity, type,
//! labels, owners, conditions) is extracted once, here, so that no other
//! module reaches into arbitrary JSON by convention.

use crate::models::{KnativeKind, ResourceReference};
use crate::status::Conditions;
use chrono::{DateTime, Utc};
use kube::core::DynamicObject;
use serde_json::Value;
use std::collections::BTreeMap;

/// Object that cannot be adapted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    #[error("object is missing required field {0}")]
    MissingField(&'static str),

    #[error("failed to serialize object: {0}")]
    Serialize(String),
}

/// Owner reference declared in `metadata.ownerReferences`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: Option<String>,
    pub controller: bool,
}

/// The fields of a cluster object the engine works with
#[derive(Debug, Clone)]
pub struct ResourceSummary {
    uid: String,
    reference: ResourceReference,
    labels: BTreeMap<String, String>,
    owners: Vec<OwnerRef>,
    conditions: Conditions,
    created: Option<DateTime<Utc>>,
    raw: Value,
}

impl ResourceSummary {
    /// Adapt a serialized object (`apiVersion`, `kind`, `metadata`, ...)
    pub fn from_value(raw: Value) -> Result<Self, ObjectError> {
        let metadata = raw
            .get("metadata")
            .ok_or(ObjectError::MissingField("metadata"))?;

        let uid = metadata
            .get("uid")
            .and_then(|u| u.as_str())
            .filter(|u| !u.is_empty())
            .ok_or(ObjectError::MissingField("metadata.uid"))?
            .to_string();

        let name = metadata
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or(ObjectError::MissingField("metadata.name"))?;

        let api_version = raw
            .get("apiVersion")
            .and_then(|a| a.as_str())
            .filter(|a| !a.is_empty())
            .ok_or(ObjectError::MissingField("apiVersion"))?;

        let kind = raw
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or(ObjectError::MissingField("kind"))?;

        let mut reference = ResourceReference::new(api_version, kind).with_name(name);
        if let Some(namespace) = metadata.get("namespace").and_then(|n| n.as_str()) {
            reference = reference.with_namespace(namespace);
        }

        let labels = metadata
            .get("labels")
            .and_then(|l| l.as_object())
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let owners = metadata
            .get("ownerReferences")
            .and_then(|o| o.as_array())
            .map(|refs| refs.iter().filter_map(parse_owner_ref).collect())
            .unwrap_or_default();

        let created = metadata
            .get("creationTimestamp")
            .and_then(|t| t.as_str())
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        let conditions = Conditions::from_object(&raw);

        Ok(Self {
            uid,
            reference,
            labels,
            owners,
            conditions,
            created,
            raw,
        })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn reference(&self) -> &ResourceReference {
        &self.reference
    }

    pub fn name(&self) -> &str {
        self.reference.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.reference.namespace.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.reference.kind
    }

    pub fn api_version(&self) -> &str {
        &self.reference.api_version
    }

    /// The recognized kind, if the engine knows how to traverse it
    pub fn known_kind(&self) -> Option<KnativeKind> {
        KnativeKind::from_type(self.api_version(), self.kind())
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn owners(&self) -> &[OwnerRef] {
        &self.owners
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// String field at a JSON pointer, e.g. `/status/latestCreatedRevisionName`
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.raw.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Array field at a JSON pointer
    pub fn array_at(&self, pointer: &str) -> &[Value] {
        self.raw
            .pointer(pointer)
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl TryFrom<&DynamicObject> for ResourceSummary {
    type Error = ObjectError;

    fn try_from(obj: &DynamicObject) -> Result<Self, Self::Error> {
        let raw = serde_json::to_value(obj).map_err(|e| ObjectError::Serialize(e.to_string()))?;
        Self::from_value(raw)
    }
}

impl TryFrom<DynamicObject> for ResourceSummary {
    type Error = ObjectError;

    fn try_from(obj: DynamicObject) -> Result<Self, Self::Error> {
        Self::try_from(&obj)
    }
}

fn parse_owner_ref(owner: &Value) -> Option<OwnerRef> {
    let kind = owner.get("kind").and_then(|k| k.as_str())?;
    let name = owner.get("name").and_then(|n| n.as_str())?;
    let api_version = owner.get("apiVersion").and_then(|a| a.as_str())?;
    Some(OwnerRef {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
        uid: owner
            .get("uid")
            .and_then(|u| u.as_str())
            .map(|u| u.to_string()),
        controller: owner
            .get("controller")
            .and_then(|c| c.as_bool())
            .unwrap_or(false),
    })
}
