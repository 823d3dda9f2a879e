use serde::{Deserialize, Serialize};

/// Where statistics documents live.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// MongoDB connection string, credentials included if needed.
    pub uri: String,
    /// Database holding the statistics collection.
    pub database: String,
    /// Collection holding one document per repository.
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://127.0.0.1:27017".to_owned(),
            database: "registry-stats".to_owned(),
            collection: "repository-stats".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(c.database, "registry-stats");
        assert_eq!(c.collection, "repository-stats");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: StoreConfig = toml::from_str("database = \"stats\"").unwrap();
        assert_eq!(c.database, "stats");
        assert_eq!(c.collection, "repository-stats");
    }
}
