//! Closed priority scale used by weighted promotion.
//!
//! Ordering is by rank only: `N/A < Low < Middle < High < Critical`. Free text
//! is mapped through [`Priority::from_text`]; unrecognised text becomes
//! [`Priority::NotAvailable`] rather than an error.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    #[default]
    NotAvailable = 1,
    Low = 2,
    Middle = 3,
    High = 4,
    Critical = 5,
}

impl Priority {
    pub fn from_text(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Priority::Critical,
            "HIGH" => Priority::High,
            "MIDDLE" | "MEDIUM" => Priority::Middle,
            "LOW" => Priority::Low,
            _ => Priority::NotAvailable,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Middle => "Middle",
            Priority::Low => "Low",
            Priority::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
