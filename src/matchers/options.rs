use serde::{Deserialize, Serialize};

/// Case sensitivity settings passed into every match call.
///
/// All comparisons are case-insensitive by default. Ports are always compared
/// case-insensitively and header names are always compared case-insensitively, since neither
/// carries case information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchOptions {
    pub scheme_case_insensitive: bool,
    pub host_case_insensitive: bool,
    pub path_case_insensitive: bool,
    pub query_case_insensitive: bool,
    pub header_values_case_insensitive: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            scheme_case_insensitive: true,
            host_case_insensitive: true,
            path_case_insensitive: true,
            query_case_insensitive: true,
            header_values_case_insensitive: true,
        }
    }
}

impl MatchOptions {
    /// Every comparison is case-sensitive.
    pub fn strict() -> Self {
        Self {
            scheme_case_insensitive: false,
            host_case_insensitive: false,
            path_case_insensitive: false,
            query_case_insensitive: false,
            header_values_case_insensitive: false,
        }
    }

    pub fn with_scheme_case_insensitive(mut self, value: bool) -> Self {
        self.scheme_case_insensitive = value;
        self
    }

    pub fn with_host_case_insensitive(mut self, value: bool) -> Self {
        self.host_case_insensitive = value;
        self
    }

    pub fn with_path_case_insensitive(mut self, value: bool) -> Self {
        self.path_case_insensitive = value;
        self
    }

    pub fn with_query_case_insensitive(mut self, value: bool) -> Self {
        self.query_case_insensitive = value;
        self
    }

    pub fn with_header_values_case_insensitive(mut self, value: bool) -> Self {
        self.header_values_case_insensitive = value;
        self
    }
}
