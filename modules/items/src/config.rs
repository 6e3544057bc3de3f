use serde::{Deserialize, Serialize};

/// Configuration for the items module (`modules.items` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemsConfig {
    /// Page size used by `GET /items` when `limit` is absent.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound applied to any requested `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    100
}
