//! Branch entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned branch identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(i32);

impl BranchId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields of a branch that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBranch {
    pub branch_name: String,
    pub address: String,
    pub phone: String,
}

/// Clinic location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    id: BranchId,
    branch_name: String,
    address: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Branch {
    /// Build a branch from stored values
    pub fn new(
        id: BranchId,
        branch_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            branch_name: branch_name.into(),
            address: address.into(),
            phone: phone.into(),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_branch_name(&mut self, branch_name: impl Into<String>) {
        self.branch_name = branch_name.into();
        self.touch();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.touch();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_serializes_camel_case() {
        let now = Utc::now();
        let branch = Branch::new(BranchId::new(7), "Downtown", "1 Main St", "555-0100", now, now);

        let json = serde_json::to_value(&branch).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["branchName"], "Downtown");
        assert_eq!(json["phone"], "555-0100");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_setters_touch_timestamp() {
        let now = Utc::now();
        let mut branch = Branch::new(BranchId::new(1), "A", "B", "C", now, now);

        std::thread::sleep(std::time::Duration::from_millis(5));
        branch.set_address("2 Side St");

        assert_eq!(branch.address(), "2 Side St");
        assert!(branch.updated_at() > now);
        assert_eq!(branch.created_at(), now);
    }
}
