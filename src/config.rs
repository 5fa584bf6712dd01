use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the database location
pub const DATABASE_ENV: &str = "IMPACT_STORIES_DB";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ImpactConfig {
    /// Database file, relative to the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("impact-stories.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".impact-stories").join("impact-stories.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ImpactConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ImpactConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ImpactConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database: explicit flag or env first, then config, then the default under `base`.
pub fn resolve_database_path(
    explicit: Option<&Path>,
    config: Option<&ImpactConfig>,
    base: &Path,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match config.and_then(|c| c.database.as_deref()) {
        Some(db) if !db.trim().is_empty() => base.join(db),
        _ => default_database_path_in(base),
    }
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let base = Path::new("/work");
        let config = ImpactConfig { database: Some("data/stories.db".into()) };

        assert_eq!(
            resolve_database_path(Some(Path::new("/tmp/x.db")), Some(&config), base),
            PathBuf::from("/tmp/x.db")
        );
        assert_eq!(
            resolve_database_path(None, Some(&config), base),
            PathBuf::from("/work/data/stories.db")
        );
        assert_eq!(
            resolve_database_path(None, None, base),
            PathBuf::from("/work/.impact-stories/impact-stories.db")
        );
        assert_eq!(
            resolve_database_path(None, Some(&ImpactConfig::default()), base),
            default_database_path_in(base)
        );
    }

    #[test]
    fn test_config_roundtrip_and_overwrite_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact-stories.toml");
        let config = ImpactConfig { database: Some("stories.db".into()) };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &ImpactConfig::default(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(ImpactConfig::default()));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(Some(&dir.path().join("absent.toml"))).unwrap(), None);
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("stories.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
