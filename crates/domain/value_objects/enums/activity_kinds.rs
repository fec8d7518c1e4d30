use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Post,
    Update,
    Edit,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Post => "post",
            ActivityKind::Update => "update",
            ActivityKind::Edit => "edit",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "post" => Some(ActivityKind::Post),
            "update" => Some(ActivityKind::Update),
            "edit" => Some(ActivityKind::Edit),
            _ => None,
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
