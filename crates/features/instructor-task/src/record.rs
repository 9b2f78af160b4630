use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A value stored as a versioned configuration table.
pub trait ConfigValue:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Table name, used as the cache key and in logs.
    const NAME: &'static str;
}

/// One immutable row of a versioned configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord<T> {
    pub id: u64,
    pub change_date: DateTime<Utc>,
    pub changed_by: Option<String>,
    pub enabled: bool,
    #[serde(flatten)]
    pub value: T,
}

/// The administrative input for a new row; the store assigns id and date.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange<T> {
    pub value: T,
    pub changed_by: Option<String>,
    pub enabled: bool,
}

impl<T> ConfigChange<T> {
    pub fn new(value: T, changed_by: Option<String>, enabled: bool) -> Self {
        Self { value, changed_by, enabled }
    }

    /// Turns the change into the row numbered `id`.
    pub fn into_record(self, id: u64) -> ConfigRecord<T> {
        ConfigRecord {
            id,
            change_date: Utc::now(),
            changed_by: self.changed_by,
            enabled: self.enabled,
            value: self.value,
        }
    }
}
