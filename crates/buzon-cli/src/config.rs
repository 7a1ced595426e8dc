// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use buzon_app::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, FixedCredentials};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            auth: Auth::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub data_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Auth {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub sort_ascending: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            sort_ascending: Some(false),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("BUZON_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set BUZON_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(buzon_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and place values under [storage], [auth], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(data_path) = &self.storage.data_path {
            buzon_store::validate_data_path(data_path)
                .with_context(|| format!("storage.data_path in {}", path.display()))?;
        }

        // Either both halves of the pair or neither; a lone username would
        // silently fall back to the default password.
        if self.auth.username.is_some() != self.auth.password.is_some() {
            bail!(
                "config {} sets only one of auth.username/auth.password; set both or neither",
                path.display()
            );
        }

        if let Some(username) = &self.auth.username
            && username.trim().is_empty()
        {
            bail!("auth.username in {} must not be blank", path.display());
        }

        Ok(())
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.storage.data_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => buzon_store::default_data_path(),
        }
    }

    pub fn credentials(&self) -> FixedCredentials {
        match (&self.auth.username, &self.auth.password) {
            (Some(username), Some(password)) => {
                FixedCredentials::new(username.clone(), password.clone())
            }
            _ => FixedCredentials::default(),
        }
    }

    pub fn sort_ascending(&self) -> bool {
        self.ui.sort_ascending.unwrap_or(false)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# buzon configuration ({})\n\
             version = {CONFIG_VERSION}\n\
             \n\
             [storage]\n\
             # data_path = \"/home/me/.local/share/buzon/contact_messages.json\"\n\
             \n\
             [auth]\n\
             # username = {DEFAULT_ADMIN_USERNAME:?}\n\
             # password = {DEFAULT_ADMIN_PASSWORD:?}\n\
             \n\
             [ui]\n\
             sort_ascending = false\n",
            path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use buzon_app::{AuthenticationProvider, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
    use std::fs;
    use std::path::Path;

    fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let config = Config::load(Path::new("/nonexistent/buzon-config.toml"))?;
        assert_eq!(config.version, 1);
        assert!(!config.sort_ascending());
        assert!(
            config
                .credentials()
                .validate(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        );
        Ok(())
    }

    #[test]
    fn versioned_config_loads_all_sections() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(
            dir.path(),
            "version = 1\n\n[storage]\ndata_path = \"/tmp/inbox.json\"\n\n[auth]\nusername = \"admin\"\npassword = \"secret\"\n\n[ui]\nsort_ascending = true\n",
        );

        let config = Config::load(&path)?;
        assert_eq!(config.data_path()?, Path::new("/tmp/inbox.json"));
        assert!(config.sort_ascending());
        assert!(config.credentials().validate("admin", "secret"));
        assert!(!config.credentials().validate("admin", "wrong"));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(dir.path(), "[ui]\nsort_ascending = true\n");

        let error = Config::load(&path).expect_err("missing version should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn wrong_version_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(dir.path(), "version = 9\n");

        let error = Config::load(&path).expect_err("wrong version should fail");
        assert!(error.to_string().contains("unsupported config version 9"));
        Ok(())
    }

    #[test]
    fn half_configured_credentials_are_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(dir.path(), "version = 1\n\n[auth]\nusername = \"admin\"\n");

        let error = Config::load(&path).expect_err("lone username should fail");
        assert!(error.to_string().contains("both or neither"));
        Ok(())
    }

    #[test]
    fn directory_data_path_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let body = format!("version = 1\n\n[storage]\ndata_path = {:?}\n", dir.path());
        let path = write_config(dir.path(), &body);

        let error = Config::load(&path).expect_err("directory path should fail");
        assert!(error.to_string().contains("storage.data_path"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_the_loader() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(
            dir.path(),
            &Config::example_config(&dir.path().join("config.toml")),
        );

        let config = Config::load(&path)?;
        assert!(!config.sort_ascending());
        Ok(())
    }
}
