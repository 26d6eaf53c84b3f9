use catalog_types::{method, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Static method → roles table.
///
/// Methods that are not listed are open to every caller, authenticated or not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy {
    rules: BTreeMap<String, BTreeSet<Role>>,
}

impl AccessPolicy {
    pub fn from_rules<I, M, R>(rules: I) -> Self
    where
        I: IntoIterator<Item = (M, R)>,
        M: Into<String>,
        R: IntoIterator<Item = Role>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(method, roles)| (method.into(), roles.into_iter().collect()))
                .collect(),
        }
    }

    pub fn laptop_service() -> Self {
        Self::from_rules([
            (method::CREATE_LAPTOP, vec![Role::Admin]),
            (method::UPLOAD_IMAGE, vec![Role::Admin]),
            (method::RATE_LAPTOP, vec![Role::Admin, Role::User]),
        ])
    }

    /// Replaces the rule of every method named in `overrides`.
    pub fn merged_with(mut self, overrides: AccessPolicy) -> Self {
        self.rules.extend(overrides.rules);
        self
    }

    pub fn requires_auth(&self, method: &str) -> bool {
        self.rules.contains_key(method)
    }

    pub fn allowed_roles(&self, method: &str) -> Option<&BTreeSet<Role>> {
        self.rules.get(method)
    }

    pub fn is_allowed(&self, method: &str, role: Role) -> bool {
        match self.rules.get(method) {
            Some(roles) => roles.contains(&role),
            None => true,
        }
    }

    /// Methods a client must attach a token to.
    pub fn protected_methods(&self) -> BTreeSet<String> {
        self.rules.keys().cloned().collect()
    }
}
