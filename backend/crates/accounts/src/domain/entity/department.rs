//! Department Entity
//!
//! A named group of profiles. The name doubles as the role token a
//! member may select for their session.

use kernel::id::DepartmentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub department_id: DepartmentId,
    pub name: String,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            department_id: DepartmentId::new(),
            name: name.into(),
        }
    }
}
