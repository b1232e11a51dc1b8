use super::PaperStore;
use crate::error::Result;
use crate::settings::SettingKey;

impl PaperStore {
    /// Value of a setting; `""` when unknown or when storage fails
    pub fn get_setting(&self, key: &str) -> String {
        let value = self.db().and_then(|db| db.get_setting(key));

        match value {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read setting");
                String::new()
            }
        }
    }

    /// Insert or replace a setting
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.db()?.upsert_setting(key, value)
    }

    /// Directory the user last opened, `""` if none
    pub fn last_directory(&self) -> String {
        self.get_setting(SettingKey::LastDirectory.as_str())
    }

    pub fn set_last_directory(&self, dir: &str) -> Result<()> {
        self.set_setting(SettingKey::LastDirectory.as_str(), dir)
    }
}
