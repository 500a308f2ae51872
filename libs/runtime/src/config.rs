use anyhow::{Context, Result};
use routine_db::DbConnConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration: typed global sections plus a per-module bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base directory for relative paths (log files, SQLite files).
    /// Empty means `$HOME/.routine`; normalized to an absolute path on load.
    #[serde(default)]
    pub home_dir: String,
    pub database: Option<DbConnConfig>,
    /// Uses [`default_logging_config`] when absent.
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// module name → raw config value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

/// Subsystem (crate target) → logging settings.
/// The "default" key catches everything not matched by another key.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub console_level: String, // "info", "debug", "off", ...
    #[serde(default)]
    pub file: String, // empty = no file output
    #[serde(default = "default_file_level")]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_file_level() -> String {
    "debug".to_string()
}

pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/routine.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            database: Some(DbConnConfig::default()),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// defaults → YAML file → `APP__*` environment, then normalize `home_dir`.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            database: None,
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // APP__DATABASE__DSN=... maps to database.dsn
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .context("Failed to extract config from figment")?;

        config.home_dir = resolve_home_dir(&config.home_dir)
            .context("Failed to resolve home_dir")?
            .to_string_lossy()
            .to_string();

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                c.home_dir = resolve_home_dir(&c.home_dir)
                    .context("Failed to resolve home_dir (defaults)")?
                    .to_string_lossy()
                    .to_string();
                Ok(c)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of `modules.<name>`; `T::default()` when the module has no section.
    pub fn module_config<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid config for module '{name}'")),
            None => Ok(T::default()),
        }
    }

    /// Database section, falling back to in-memory SQLite.
    pub fn database_or_default(&self) -> DbConnConfig {
        self.database.clone().unwrap_or_default()
    }
}

const DEFAULT_SUBDIR: &str = ".routine";

fn user_home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Expand `~`, anchor relative paths at the current directory, and create the directory.
fn resolve_home_dir(raw: &str) -> Result<PathBuf> {
    let raw = raw.trim();
    let path = if raw.is_empty() {
        user_home()
            .context("no home directory in environment")?
            .join(DEFAULT_SUBDIR)
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_home()
            .context("cannot expand '~': no home directory in environment")?
            .join(rest)
    } else if raw == "~" {
        user_home().context("cannot expand '~': no home directory in environment")?
    } else {
        PathBuf::from(raw)
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    std::fs::create_dir_all(&path)
        .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    Ok(path)
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        bag.insert(name.to_string(), serde_json::to_value(val)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Paging {
        #[serde(default)]
        size: u64,
    }

    #[test]
    fn default_config_structure() {
        let config = AppConfig::default();
        assert_eq!(config.home_dir, "");
        assert_eq!(config.database, Some(DbConnConfig::default()));

        let logging = config.logging.as_ref().unwrap();
        assert_eq!(logging["default"].console_level, "info");
        assert_eq!(logging["default"].file, "logs/routine.log");
        assert!(config.modules.is_empty());
    }

    #[test]
    fn load_layered_reads_yaml_and_normalizes_home_dir() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("home");
        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            r#"
home_dir: "{}"
database:
  dsn: "sqlite://database/routine.db"
  busy_timeout_ms: 1000
logging:
  default:
    console_level: debug
    file: "logs/default.log"
modules:
  routine:
    default_page_size: 7
"#,
            home.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert!(Path::new(&config.home_dir).is_absolute());
        assert!(home.exists());

        let db = config.database.as_ref().unwrap();
        assert_eq!(db.dsn, "sqlite://database/routine.db");
        assert_eq!(db.busy_timeout_ms, Some(1000));

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file_level, "debug");
        assert_eq!(config.modules["routine"]["default_page_size"], 7);
    }

    #[test]
    fn optional_sections_stay_empty_in_layered_load() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().to_string_lossy().replace('\\', "/");
        fs::write(&cfg_path, format!("home_dir: \"{home}\"\n")).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert!(config.database.is_none());
        assert!(config.logging.is_none());
        assert_eq!(config.database_or_default().dsn, "sqlite::memory:");
    }

    #[test]
    fn environment_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            let home = jail.directory().to_string_lossy().replace('\\', "/");
            jail.create_file(
                "cfg.yaml",
                &format!("home_dir: \"{home}\"\ndatabase:\n  dsn: \"sqlite://a.db\"\n"),
            )?;
            jail.set_env("APP__DATABASE__DSN", "sqlite://b.db");

            let config = AppConfig::load_layered("cfg.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.database.unwrap().dsn, "sqlite://b.db");
            Ok(())
        });
    }

    #[test]
    fn modules_dir_files_are_merged() {
        let tmp = tempdir().unwrap();
        let modules_dir = tmp.path().join("modules");
        fs::create_dir_all(&modules_dir).unwrap();
        fs::write(modules_dir.join("routine.yaml"), "max_page_size: 50\n").unwrap();
        fs::write(modules_dir.join("notes.txt"), "ignored").unwrap();

        let yaml = format!(
            "home_dir: \"{}\"\nmodules_dir: \"{}\"\nmodules:\n  other:\n    key: value\n",
            tmp.path().to_string_lossy().replace('\\', "/"),
            modules_dir.to_string_lossy().replace('\\', "/"),
        );
        let cfg_path = tmp.path().join("cfg.yaml");
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.modules["routine"]["max_page_size"], 50);
        assert_eq!(config.modules["other"]["key"], "value");
    }

    #[test]
    fn module_config_is_typed_or_default() {
        let mut config = AppConfig::default();
        assert_eq!(config.module_config::<Paging>("paging").unwrap(), Paging::default());

        config
            .modules
            .insert("paging".into(), serde_json::json!({ "size": 9 }));
        assert_eq!(config.module_config::<Paging>("paging").unwrap().size, 9);

        config
            .modules
            .insert("paging".into(), serde_json::json!({ "size": "many" }));
        assert!(config.module_config::<Paging>("paging").is_err());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        fs::write(&cfg_path, "server:\n  port: 8080\n").unwrap();
        assert!(AppConfig::load_layered(&cfg_path).is_err());
    }

    #[test]
    fn to_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("database:"));
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.database, config.database);
        assert_eq!(back.logging, config.logging);
    }
}
