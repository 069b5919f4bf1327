//! Access grants: account-level permissions attached to an owning account.
//!
//! Permission names are matched exactly against a fixed set.

use super::errors::MetadataError;
use serde::{Deserialize, Serialize};
use shared_types::AccountCodec;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Write,
    Update,
    Delete,
    /// May grant permissions to others.
    Grant,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::Read,
        Permission::Write,
        Permission::Update,
        Permission::Delete,
        Permission::Grant,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::Grant => "grant",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Permission {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| MetadataError::invalid("access grant", format!("unknown permission {s:?}")))
    }
}

/// Permissions held by one grantee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub address: String,
    pub permissions: Vec<Permission>,
}

impl AccessGrant {
    pub fn new(address: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            address: address.into(),
            permissions,
        }
    }

    /// Build a grant from permission names.
    pub fn parse<S: AsRef<str>>(
        address: impl Into<String>,
        permissions: &[S],
    ) -> Result<Self, MetadataError> {
        let permissions = permissions
            .iter()
            .map(|p| p.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(address, permissions))
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Validate the grants attached to the `target` account.
pub fn validate_access_grants(
    target: &str,
    grants: &[AccessGrant],
    codec: &dyn AccountCodec,
) -> Result<(), MetadataError> {
    let target_acc = codec.decode(target).ok();
    let mut grantees = BTreeSet::new();

    for grant in grants {
        let acc = codec.decode(&grant.address).map_err(|e| {
            MetadataError::InvalidParty(format!("invalid grantee address [{}]: {e}", grant.address))
        })?;
        if target_acc.as_ref() == Some(&acc) {
            return Err(MetadataError::DuplicateParty(format!(
                "{target} cannot grant access to itself"
            )));
        }
        if !grantees.insert(acc) {
            return Err(MetadataError::DuplicateParty(format!(
                "grantee [{}] is listed more than once",
                grant.address
            )));
        }

        if grant.permissions.is_empty() {
            return Err(MetadataError::invalid(
                "access grant",
                format!("grant for [{}] has no permissions", grant.address),
            ));
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = grant.permissions.iter().find(|p| !seen.insert(**p)) {
            return Err(MetadataError::invalid(
                "access grant",
                format!("grant for [{}] lists {dup} more than once", grant.address),
            ));
        }
    }
    Ok(())
}
