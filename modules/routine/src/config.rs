use paging_core::PageSizeCfg;
use serde::{Deserialize, Serialize};

/// Configuration for the routine module (`modules.routine`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoutineConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl RoutineConfig {
    pub fn page_size_cfg(&self) -> PageSizeCfg {
        PageSizeCfg {
            default: self.default_page_size.clamp(1, self.max_page_size.max(1)),
            max: self.max_page_size.max(1),
        }
    }
}

fn default_page_size() -> u64 {
    5
}

fn default_max_page_size() -> u64 {
    20
}
