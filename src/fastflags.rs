//! FastFlag profiles: named sets of engine flags the user can switch on and
//! off, stored as a JSON array in a single file.
//!
//! Every mutation reads the whole file, changes it and writes it back in one
//! piece through a temporary file, so a crash never leaves half a document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::logging::DebugLogger;

/// Flag name to value, in file order.
pub type FlagMap = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub enabled_studio: bool,
    #[serde(default)]
    pub data: FlagMap,
}

impl Profile {
    /// A fresh profile as created by [`ProfileStore::add`]: disabled, with a
    /// single example flag.
    pub fn template(name: impl Into<String>) -> Self {
        let mut data = FlagMap::new();
        data.insert("ExampleFlag".to_string(), Value::String("ExampleValue".to_string()));
        Self {
            name: name.into(),
            description: None,
            enabled: false,
            enabled_studio: false,
            data,
        }
    }
}

pub struct ProfileStore {
    path: PathBuf,
    logger: DebugLogger,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: DebugLogger::disabled(),
        }
    }

    pub fn with_logger(mut self, logger: DebugLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All profiles in file order; a missing file is an empty list.
    pub fn read(&self) -> Result<Vec<Profile>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Union of the flags of every enabled profile. Profiles later in the
    /// file win when two define the same flag.
    pub fn list_active(&self) -> Result<FlagMap> {
        let mut active = FlagMap::new();
        for profile in self.read()?.into_iter().filter(|p| p.enabled) {
            active.extend(profile.data);
        }
        Ok(active)
    }

    /// Same as [`list_active`](Self::list_active) for profiles enabled in Studio.
    pub fn list_active_studio(&self) -> Result<FlagMap> {
        let mut active = FlagMap::new();
        for profile in self.read()?.into_iter().filter(|p| p.enabled_studio) {
            active.extend(profile.data);
        }
        Ok(active)
    }

    pub fn get(&self, name: &str) -> Result<Profile> {
        self.read()?
            .into_iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Creates a template profile at the top of the list.
    pub fn add(&self, name: &str) -> Result<()> {
        let mut profiles = self.read()?;
        if profiles.iter().any(|profile| profile.name == name) {
            return Err(Error::ProfileExists(name.to_string()));
        }
        profiles.insert(0, Profile::template(name));
        self.write(&profiles)?;
        let _ = self.logger.log_profile_change("add", name);
        Ok(())
    }

    /// Deletes the profile if present. Removing the last profile deletes the
    /// backing file.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut profiles = self.read()?;
        profiles.retain(|profile| profile.name != name);

        if profiles.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            self.write(&profiles)?;
        }
        let _ = self.logger.log_profile_change("remove", name);
        Ok(())
    }

    pub fn rename(&self, name: &str, new_name: &str) -> Result<()> {
        self.update(name, |profile| profile.name = new_name.to_string())?;
        let _ = self.logger.log_profile_change("rename", &format!("{} -> {}", name, new_name));
        Ok(())
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        self.update(name, |profile| profile.enabled = enabled)?;
        let action = if enabled { "enable" } else { "disable" };
        let _ = self.logger.log_profile_change(action, name);
        Ok(())
    }

    /// Toggles the profile for Roblox Studio launches.
    pub fn set_enabled_studio(&self, name: &str, enabled: bool) -> Result<()> {
        self.update(name, |profile| profile.enabled_studio = enabled)?;
        let action = if enabled { "enable studio" } else { "disable studio" };
        let _ = self.logger.log_profile_change(action, name);
        Ok(())
    }

    pub fn set_description(&self, name: &str, description: Option<&str>) -> Result<()> {
        self.update(name, |profile| profile.description = description.map(str::to_string))
    }

    /// Sets one flag inside a profile, keeping its position if it exists.
    pub fn set_flag(&self, name: &str, key: &str, value: Value) -> Result<()> {
        self.update(name, |profile| {
            profile.data.insert(key.to_string(), value);
        })?;
        let _ = self.logger.log_profile_change("set flag", &format!("{}.{}", name, key));
        Ok(())
    }

    /// Removes one flag from a profile; an unknown flag is a no-op.
    pub fn remove_flag(&self, name: &str, key: &str) -> Result<()> {
        self.update(name, |profile| {
            profile.data.shift_remove(key);
        })?;
        let _ = self.logger.log_profile_change("remove flag", &format!("{}.{}", name, key));
        Ok(())
    }

    fn update(&self, name: &str, change: impl FnOnce(&mut Profile)) -> Result<()> {
        let mut profiles = self.read()?;
        let profile = profiles
            .iter_mut()
            .find(|profile| profile.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?;
        change(profile);
        self.write(&profiles)
    }

    fn write(&self, profiles: &[Profile]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        {
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut temp, PrettyFormatter::with_indent(b"    "));
            profiles.serialize(&mut serializer).map_err(|source| Error::Json {
                path: self.path.clone(),
                source,
            })?;
        }
        temp.write_all(b"\n")?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| Error::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}
