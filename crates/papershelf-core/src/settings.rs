//! Known setting keys

/// Settings the application shell persists between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Directory the user last opened
    LastDirectory,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::LastDirectory => "lastDirectory",
        }
    }
}
