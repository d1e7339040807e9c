//! Keyword classifier for incoming requests.
//!
//! Maps free-text title + description to a default category, priority,
//! assigned unit, and acknowledgment message. Deterministic and total:
//! every input classifies, falling through to `Other` / `Medium` when no
//! rule matches. Matching is case-insensitive substring containment, with
//! no word-boundary handling.
//!
//! Both rule lists are evaluated first-match-wins, so list order encodes
//! precedence. "fire alarm and a slow computer" resolves to the IT category
//! because the IT rule is checked before the safety rule.

use serde::Serialize;

use crate::types::{Category, Priority};

/// Classifier output for a new request. Caller-supplied overrides are
/// applied via [`classify_with_overrides`]; the classifier itself is only
/// a default-fill step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
    pub assigned_unit: &'static str,
    pub generated_response: String,
}

/// Category rules in precedence order. Any keyword present selects the rule.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (
        &[
            "computer", "laptop", "printer", "monitor", "keyboard", "network", "internet",
            "wifi", "vpn", "software", "email", "password", "login", "server", "system", "screen",
        ],
        Category::ItSupport,
    ),
    (
        &[
            "air conditioning", "conditioner", "electric", "electricity", "plumbing", "water",
            "leak", "light", "lighting", "door", "window", "elevator", "cleaning", "maintenance",
        ],
        Category::Facilities,
    ),
    (
        &[
            "chair", "desk", "table", "cabinet", "furniture", "equipment", "projector",
            "supplies", "stationery",
        ],
        Category::Equipment,
    ),
    (
        &[
            "fire", "smoke", "alarm", "hazard", "safety", "injury", "accident", "first aid",
            "evacuation",
        ],
        Category::Safety,
    ),
    (
        &[
            "salary", "payroll", "leave", "vacation", "contract", "training", "recruitment",
            "staff", "overtime", "attendance",
        ],
        Category::HumanResources,
    ),
];

/// Priority rules, most urgent first. Independent of the category outcome.
const PRIORITY_RULES: &[(&[&str], Priority)] = &[
    (
        &[
            "urgent", "emergency", "critical", "immediately", "broken", "down", "not working",
            "fire", "injury", "flood", "danger",
        ],
        Priority::Critical,
    ),
    (
        &["important", "asap", "as soon as possible", "blocking", "severe", "high priority"],
        Priority::High,
    ),
    (
        &["whenever", "no rush", "minor", "low priority", "suggestion", "someday"],
        Priority::Low,
    ),
];

/// Classify a request from its title and description.
pub fn classify(title: &str, description: &str) -> Classification {
    let text = format!("{} {}", title, description).to_lowercase();

    let category = CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other);

    let priority = PRIORITY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, priority)| *priority)
        .unwrap_or(Priority::Medium);

    Classification {
        category,
        priority,
        assigned_unit: unit_for(category),
        generated_response: acknowledgment(category, title),
    }
}

/// Classify, then let explicit caller choices win over the keyword rules.
/// The unit and acknowledgment follow the final category.
pub fn classify_with_overrides(
    title: &str,
    description: &str,
    category_override: Option<Category>,
    priority_override: Option<Priority>,
) -> Classification {
    let base = classify(title, description);
    let category = category_override.unwrap_or(base.category);
    let priority = priority_override.unwrap_or(base.priority);

    Classification {
        category,
        priority,
        assigned_unit: unit_for(category),
        generated_response: acknowledgment(category, title),
    }
}

/// Routing table from category to the unit that owns it.
pub fn unit_for(category: Category) -> &'static str {
    match category {
        Category::ItSupport => "IT Division",
        Category::Facilities => "Technical Division",
        Category::Equipment => "Procurement Division",
        Category::Safety => "Safety Division",
        Category::HumanResources => "HR Division",
        Category::Other => "General Support",
    }
}

/// Per-category acknowledgment sent back to the submitter.
pub fn acknowledgment(category: Category, title: &str) -> String {
    match category {
        Category::ItSupport => format!(
            "Your request \"{}\" has been received and routed to the IT Division. A technician will contact you shortly.",
            title
        ),
        Category::Facilities => format!(
            "Your request \"{}\" has been received by the Technical Division. A maintenance visit will be scheduled.",
            title
        ),
        Category::Equipment => format!(
            "Your request \"{}\" has been forwarded to the Procurement Division for review and fulfillment.",
            title
        ),
        Category::Safety => format!(
            "Your request \"{}\" has been escalated to the Safety Division and will be inspected as a priority.",
            title
        ),
        Category::HumanResources => format!(
            "Your request \"{}\" has been passed to the HR Division. You will receive a response within two business days.",
            title
        ),
        Category::Other => format!(
            "Your request \"{}\" has been received by General Support and will be dispatched to the appropriate unit.",
            title
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_falls_through_to_defaults() {
        let c = classify("", "");
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.priority, Priority::Medium);
        assert_eq!(c.assigned_unit, "General Support");
    }

    #[test]
    fn whitespace_only_input_classifies() {
        let c = classify("   ", "\t\n");
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.priority, Priority::Medium);
    }

    #[test]
    fn broken_laptop_is_critical_it() {
        let c = classify("laptop broken", "my laptop won't turn on");
        assert_eq!(c.category, Category::ItSupport);
        assert_eq!(c.category.as_str(), "IT and Technical Support");
        assert_eq!(c.priority, Priority::Critical);
        assert_eq!(c.assigned_unit, "IT Division");
    }

    #[test]
    fn it_rule_precedes_safety_rule() {
        // "fire" matches the safety rule, "computer" matches IT; IT is
        // checked first so it wins.
        let c = classify("fire alarm and a slow computer", "the machine takes minutes to boot");
        assert_eq!(c.category, Category::ItSupport);
        // priority still picks up "fire" from its own rule list
        assert_eq!(c.priority, Priority::Critical);
    }

    #[test]
    fn priority_is_independent_of_category() {
        let c = classify("office chair", "the wheel is broken");
        assert_eq!(c.category, Category::Equipment);
        assert_eq!(c.priority, Priority::Critical);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = classify("PRINTER Jammed", "URGENT please");
        assert_eq!(c.category, Category::ItSupport);
        assert_eq!(c.priority, Priority::Critical);
    }

    #[test]
    fn low_priority_keywords() {
        let c = classify("new plant for the lobby", "no rush, just a suggestion");
        assert_eq!(c.priority, Priority::Low);
    }

    #[test]
    fn acknowledgment_interpolates_title() {
        let c = classify("vpn access", "need vpn for remote work");
        assert!(c.generated_response.contains("\"vpn access\""));
        assert!(c.generated_response.contains("IT Division"));
    }

    #[test]
    fn overrides_always_win() {
        let c = classify_with_overrides(
            "laptop broken",
            "my laptop won't turn on",
            Some(Category::HumanResources),
            Some(Priority::Low),
        );
        assert_eq!(c.category, Category::HumanResources);
        assert_eq!(c.priority, Priority::Low);
        // routing and acknowledgment follow the overridden category
        assert_eq!(c.assigned_unit, "HR Division");
        assert!(c.generated_response.contains("HR Division"));
    }

    #[test]
    fn partial_override_keeps_classifier_remainder() {
        let c = classify_with_overrides("laptop broken", "", None, Some(Priority::Low));
        assert_eq!(c.category, Category::ItSupport);
        assert_eq!(c.priority, Priority::Low);
    }

    #[test]
    fn every_category_has_a_unit_and_acknowledgment() {
        for category in [
            Category::ItSupport,
            Category::Facilities,
            Category::Equipment,
            Category::Safety,
            Category::HumanResources,
            Category::Other,
        ] {
            assert!(!unit_for(category).is_empty());
            assert!(acknowledgment(category, "x").contains("\"x\""));
        }
    }
}
