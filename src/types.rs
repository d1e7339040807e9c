/// Shared domain vocabulary used across the codebase
///
/// The string forms below are the wire and storage contract: the database
/// stores them as TEXT, the API serves them verbatim, and the classifier
/// produces them. Parsing is strict; unknown values are rejected at the
/// handler boundary.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Received,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Received => "Received",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Received" => Ok(Status::Received),
            "In Progress" => Ok(Status::InProgress),
            "Resolved" => Ok(Status::Resolved),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Request urgency, assigned by the classifier unless overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Request categories produced by the classifier keyword rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "IT and Technical Support")]
    ItSupport,
    #[serde(rename = "Facilities and Maintenance")]
    Facilities,
    #[serde(rename = "Equipment and Furniture")]
    Equipment,
    #[serde(rename = "Safety and Fire Protection")]
    Safety,
    #[serde(rename = "Human Resources")]
    HumanResources,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ItSupport => "IT and Technical Support",
            Category::Facilities => "Facilities and Maintenance",
            Category::Equipment => "Equipment and Furniture",
            Category::Safety => "Safety and Fire Protection",
            Category::HumanResources => "Human Resources",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IT and Technical Support" => Ok(Category::ItSupport),
            "Facilities and Maintenance" => Ok(Category::Facilities),
            "Equipment and Furniture" => Ok(Category::Equipment),
            "Safety and Fire Protection" => Ok(Category::Safety),
            "Human Resources" => Ok(Category::HumanResources),
            "Other" => Ok(Category::Other),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Access roles recorded in user_roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Submitter,
    Handler,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Submitter => "submitter",
            Role::Handler => "handler",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitter" => Ok(Role::Submitter),
            "handler" => Ok(Role::Handler),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
