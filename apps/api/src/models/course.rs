use serde::{Deserialize, Serialize};

/// A learning resource for a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub platform: String,
    pub title: String,
    pub url: String,
}
