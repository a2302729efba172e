/*
 * Responsibility
 * - The mapping a handler sees after a request passed its rule guard
 * - The guard inserts it into request extensions; handlers only receive this type
 */
use serde::Serialize;

use crate::services::access::{AccessLevel, PermissionMap};

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GrantedPermissions(PermissionMap);

impl GrantedPermissions {
    pub fn new(permissions: PermissionMap) -> Self {
        Self(permissions)
    }

    pub fn level(&self, area: &str) -> Option<i64> {
        self.0.get(area).copied()
    }

    pub fn allows(&self, area: &str, level: AccessLevel) -> bool {
        self.level(area).is_some_and(|granted| granted >= level.ordinal())
    }
}
