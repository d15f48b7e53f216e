use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filter::City;

/// Environment variable naming the directory that holds the city CSVs.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Environment variable naming an optional JSON file of per-city overrides.
pub const DATASETS_ENV: &str = "BIKESHARE_DATASETS";

/// Maps each city to the CSV file its trips are read from.
///
/// Overrides are stored as a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "/srv/bikeshare/chicago-2017.csv",
///   "new york city": "/srv/bikeshare/nyc.csv"
/// }
/// ```
/// Cities without an override resolve to `data_dir/<default file name>`.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    data_dir: PathBuf,
    overrides: HashMap<City, PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DatasetConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Reads [`DATA_DIR_ENV`] and, when set, the override file named by [`DATASETS_ENV`].
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".".to_string());
        Self::new(data_dir).with_env_overrides()
    }

    /// Applies the override file named by [`DATASETS_ENV`], if the variable is set.
    pub fn with_env_overrides(self) -> Result<Self> {
        match std::env::var_os(DATASETS_ENV) {
            Some(path) => self.with_overrides_file(path),
            None => Ok(self),
        }
    }

    /// Loads per-city overrides from a JSON file at `path`.
    pub fn with_overrides_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let entries: HashMap<String, PathBuf> =
            serde_json::from_str(&content).map_err(|e| config_err(e.to_string()))?;

        for (city, file) in entries {
            let city = city
                .parse::<City>()
                .map_err(|e| config_err(e.to_string()))?;
            self.overrides.insert(city, file);
        }
        Ok(self)
    }

    pub fn with_override(mut self, city: City, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(city, path.into());
        self
    }

    /// Path of the dataset for `city`.
    pub fn resolve(&self, city: City) -> PathBuf {
        self.overrides
            .get(&city)
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(city.default_file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_resolve_default_file_names() {
        let config = DatasetConfig::new("/data");

        assert_eq!(config.resolve(City::Chicago), PathBuf::from("/data/chicago.csv"));
        assert_eq!(
            config.resolve(City::NewYorkCity),
            PathBuf::from("/data/new_york_city.csv")
        );
        assert_eq!(
            config.resolve(City::Washington),
            PathBuf::from("/data/washington.csv")
        );
    }

    #[test]
    fn test_override_wins() {
        let config = DatasetConfig::new("/data").with_override(City::Washington, "/tmp/dc.csv");

        assert_eq!(config.resolve(City::Washington), PathBuf::from("/tmp/dc.csv"));
        assert_eq!(config.resolve(City::Chicago), PathBuf::from("/data/chicago.csv"));
    }

    #[test]
    fn test_overrides_file() {
        let path = temp_path("bikeshare_stats_test_overrides.json");
        fs::write(&path, r#"{"new york city": "/srv/nyc.csv"}"#).unwrap();

        let config = DatasetConfig::new("/data").with_overrides_file(&path).unwrap();
        assert_eq!(config.resolve(City::NewYorkCity), PathBuf::from("/srv/nyc.csv"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_overrides_file_rejects_unknown_city() {
        let path = temp_path("bikeshare_stats_test_bad_overrides.json");
        fs::write(&path, r#"{"boston": "/srv/boston.csv"}"#).unwrap();

        let result = DatasetConfig::new("/data").with_overrides_file(&path);
        assert!(matches!(result, Err(Error::Config { .. })));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_overrides_file() {
        let result = DatasetConfig::default()
            .with_overrides_file(temp_path("bikeshare_stats_does_not_exist.json"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
