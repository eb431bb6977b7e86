//! Contract persistence on top of a key/value port.
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::{KeyValueStore, StoreError};

/// Key holding the last stored YAML text
pub const YAML_KEY: &str = "dataContractYaml";
/// Key holding the ISO-8601 time of the last store
pub const UPDATED_KEY: &str = "dataContractYamlUpdated";

pub struct ContractStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ContractStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Store `yaml` together with the current time; returns that time.
    ///
    /// Both keys go through one `set_all` batch.
    pub fn store(&self, yaml: &str) -> Result<DateTime<Utc>, StoreError> {
        let now = Utc::now().trunc_subsecs(3);
        let stamp = format_timestamp(&now);
        self.backend
            .set_all(&[(YAML_KEY, yaml), (UPDATED_KEY, stamp.as_str())])?;
        tracing::info!(bytes = yaml.len(), updated = %stamp, "stored data contract");
        Ok(now)
    }

    /// Most recently stored text, if any
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(YAML_KEY)
    }

    /// True until the first `store`, decided by the timestamp key alone
    pub fn is_first_load(&self) -> Result<bool, StoreError> {
        Ok(self.backend.get(UPDATED_KEY)?.is_none())
    }

    pub fn last_updated(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        self.backend
            .get(UPDATED_KEY)?
            .map(|value| {
                DateTime::parse_from_rfc3339(&value)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|source| StoreError::BadTimestamp { value, source })
            })
            .transpose()
    }
}

/// `2024-05-01T12:30:00.123Z`
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
