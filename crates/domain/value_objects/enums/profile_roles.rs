use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    #[default]
    Seller,
    Admin,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Seller => "seller",
            ProfileRole::Admin => "admin",
        }
    }

    /// Anything that is not explicitly `admin` is treated as a seller.
    pub fn from_str(value: &str) -> Self {
        match value {
            "admin" => ProfileRole::Admin,
            _ => ProfileRole::Seller,
        }
    }
}

impl Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
