//! `--init`: write a default configuration file.

use std::path::Path;

use reactloop_config::AppConfig;

/// Write the default config to `dir/config.toml` unless one exists.
/// Returns whether a file was written.
pub fn write_default_config(dir: &Path) -> std::io::Result<bool> {
    let path = dir.join("config.toml");
    if path.exists() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, AppConfig::default_toml())?;
    Ok(true)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let dir = AppConfig::config_dir();
    let path = dir.join("config.toml");
    if write_default_config(&dir)? {
        println!("✅ Created config: {}", path.display());
        println!("   Add your api_key there, or export GOOGLE_API_KEY.");
    } else {
        println!("  Config already exists: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_loadable_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".reactloop");

        assert!(write_default_config(&config_dir).unwrap());
        let loaded = AppConfig::load_from(&config_dir.join("config.toml")).unwrap();
        assert_eq!(loaded.model, AppConfig::default().model);
        assert_eq!(loaded.tools.enabled, AppConfig::default().tools.enabled);
    }

    #[test]
    fn existing_config_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"custom\"\n").unwrap();

        assert!(!write_default_config(dir.path()).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "model = \"custom\"\n");
    }
}
