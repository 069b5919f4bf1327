//! Message kinds handled by the metadata service and their delegation type URLs.

use serde::{Deserialize, Serialize};
use std::fmt;

const TYPE_URL_PREFIX: &str = "/provenance.metadata.v1.";

/// Every mutating request the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgType {
    WriteScope,
    DeleteScope,
    AddScopeDataAccess,
    DeleteScopeDataAccess,
    AddScopeOwner,
    DeleteScopeOwner,
    WriteSession,
    WriteRecord,
    DeleteRecord,
    WriteScopeSpecification,
    DeleteScopeSpecification,
    WriteContractSpecification,
    DeleteContractSpecification,
    WriteRecordSpecification,
    DeleteRecordSpecification,
}

impl MsgType {
    /// Message name without the package prefix.
    pub const fn name(self) -> &'static str {
        match self {
            MsgType::WriteScope => "MsgWriteScopeRequest",
            MsgType::DeleteScope => "MsgDeleteScopeRequest",
            MsgType::AddScopeDataAccess => "MsgAddScopeDataAccessRequest",
            MsgType::DeleteScopeDataAccess => "MsgDeleteScopeDataAccessRequest",
            MsgType::AddScopeOwner => "MsgAddScopeOwnerRequest",
            MsgType::DeleteScopeOwner => "MsgDeleteScopeOwnerRequest",
            MsgType::WriteSession => "MsgWriteSessionRequest",
            MsgType::WriteRecord => "MsgWriteRecordRequest",
            MsgType::DeleteRecord => "MsgDeleteRecordRequest",
            MsgType::WriteScopeSpecification => "MsgWriteScopeSpecificationRequest",
            MsgType::DeleteScopeSpecification => "MsgDeleteScopeSpecificationRequest",
            MsgType::WriteContractSpecification => "MsgWriteContractSpecificationRequest",
            MsgType::DeleteContractSpecification => "MsgDeleteContractSpecificationRequest",
            MsgType::WriteRecordSpecification => "MsgWriteRecordSpecificationRequest",
            MsgType::DeleteRecordSpecification => "MsgDeleteRecordSpecificationRequest",
        }
    }

    /// Fully qualified type URL used as the delegation key.
    pub fn type_url(self) -> String {
        format!("{TYPE_URL_PREFIX}{}", self.name())
    }

    /// A broader message whose delegation also covers this one.
    pub const fn parent(self) -> Option<MsgType> {
        match self {
            MsgType::WriteRecord => Some(MsgType::WriteSession),
            MsgType::DeleteRecord => Some(MsgType::DeleteScope),
            MsgType::WriteRecordSpecification => Some(MsgType::WriteContractSpecification),
            MsgType::DeleteRecordSpecification => Some(MsgType::DeleteContractSpecification),
            MsgType::AddScopeDataAccess
            | MsgType::DeleteScopeDataAccess
            | MsgType::AddScopeOwner
            | MsgType::DeleteScopeOwner => Some(MsgType::WriteScope),
            _ => None,
        }
    }

    /// Type URLs to try when looking up a delegation, most specific first.
    pub fn authz_type_urls(self) -> Vec<String> {
        let mut urls = vec![self.type_url()];
        if let Some(parent) = self.parent() {
            urls.push(parent.type_url());
        }
        urls
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
