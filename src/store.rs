use std::{
    fs,
    io::ErrorKind,
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Result, SwitchError, ValidationError};
use crate::model::{file_name_for, Configuration, Template, DEFAULT_NAME};

const EMPTY_CONTENT: &[u8] = b"{}";

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
    static ref NAMED_FILE_RE: Regex = Regex::new(r"^settings\.([A-Za-z0-9_-]+)\.json$").unwrap();
}

fn name_from_file_name(file_name: &str) -> Option<String> {
    if file_name == file_name_for(DEFAULT_NAME) {
        return Some(DEFAULT_NAME.to_string());
    }
    let caps = NAMED_FILE_RE.captures(file_name)?;
    let name = &caps[1];
    // settings.default.json would shadow the bare file
    if name == DEFAULT_NAME {
        return None;
    }
    Some(name.to_string())
}

/// Every configuration currently in `dir`, `default` first and the rest by name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_configurations(dir: &Path) -> Vec<Configuration> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "configuration directory does not exist");
            return Vec::new();
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read configuration directory");
            return Vec::new();
        }
    };

    let mut out: Vec<Configuration> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        if let Some(name) = name_from_file_name(&file_name) {
            out.push(Configuration { name, path });
        }
    }

    out.sort_by_key(|c| c.sort_key());
    debug!(dir = %dir.display(), count = out.len(), "scanned configurations");
    out
}

pub fn find_configuration(dir: &Path, name: &str) -> Option<Configuration> {
    list_configurations(dir).into_iter().find(|c| c.name == name)
}

/// Checks `name` is usable for a new configuration in `dir`.
pub fn validate_name(dir: &Path, name: &str) -> std::result::Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }
    if name == DEFAULT_NAME {
        return Err(ValidationError::Reserved);
    }
    if dir.join(file_name_for(name)).exists() {
        return Err(ValidationError::AlreadyExists(name.to_string()));
    }
    Ok(())
}

pub fn create_configuration(dir: &Path, name: &str, template: &Template) -> Result<Configuration> {
    validate_name(dir, name)?;

    let content = match template {
        Template::Empty => EMPTY_CONTENT.to_vec(),
        Template::CopyFrom(source) => {
            fs::read(&source.path).map_err(|e| SwitchError::io(&source.path, e))?
        }
    };

    fs::create_dir_all(dir).map_err(|e| SwitchError::io(dir, e))?;
    let path = dir.join(file_name_for(name));
    fs::write(&path, content).map_err(|e| SwitchError::io(&path, e))?;

    info!(name, path = %path.display(), "created configuration");
    Ok(Configuration { name: name.to_string(), path })
}

pub fn delete_configuration(config: &Configuration) -> Result<()> {
    fs::remove_file(&config.path).map_err(|e| SwitchError::io(&config.path, e))?;
    info!(name = %config.name, path = %config.path.display(), "deleted configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, file_name: &str, content: &str) {
        fs::write(dir.join(file_name), content).unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        list_configurations(dir).into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let tmp = tempdir().unwrap();
        assert!(list_configurations(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let tmp = tempdir().unwrap();
        assert!(list_configurations(tmp.path()).is_empty());
    }

    #[test]
    fn default_comes_before_named_configurations() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "settings.glm.json", "{}");
        touch(tmp.path(), "settings.json", "{}");

        let configs = list_configurations(tmp.path());
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "default");
        assert_eq!(configs[0].path, tmp.path().join("settings.json"));
        assert_eq!(configs[1].name, "glm");
        assert_eq!(configs[1].path, tmp.path().join("settings.glm.json"));
    }

    #[test]
    fn named_configurations_sort_lexicographically() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "settings.zeta.json", "{}");
        touch(tmp.path(), "settings.alpha.json", "{}");
        touch(tmp.path(), "settings.Beta.json", "{}");
        assert_eq!(names(tmp.path()), vec!["Beta", "alpha", "zeta"]);
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "settings.json", "{}");
        touch(tmp.path(), "settings.local.json.bak", "{}");
        touch(tmp.path(), "settings.bad name.json", "{}");
        touch(tmp.path(), "settings..json", "{}");
        touch(tmp.path(), "settings.default.json", "{}");
        touch(tmp.path(), "other.json", "{}");
        fs::create_dir(tmp.path().join("settings.dir.json")).unwrap();

        assert_eq!(names(tmp.path()), vec!["default"]);
    }

    #[test]
    fn default_name_is_always_rejected() {
        let tmp = tempdir().unwrap();
        assert_eq!(validate_name(tmp.path(), "default"), Err(ValidationError::Reserved));
        touch(tmp.path(), "settings.json", "{}");
        assert_eq!(validate_name(tmp.path(), "default"), Err(ValidationError::Reserved));
    }

    #[test]
    fn names_outside_the_allowed_set_are_rejected() {
        let tmp = tempdir().unwrap();
        assert_eq!(validate_name(tmp.path(), ""), Err(ValidationError::Empty));
        for bad in ["foo bar", "foo.bar", "../x", "ünï", "a/b"] {
            assert_eq!(
                validate_name(tmp.path(), bad),
                Err(ValidationError::InvalidCharacters(bad.to_string())),
                "{bad}"
            );
        }
        assert_eq!(validate_name(tmp.path(), "Ok_name-2"), Ok(()));
    }

    #[test]
    fn existing_name_is_rejected() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "settings.glm.json", "{}");
        assert_eq!(
            validate_name(tmp.path(), "glm"),
            Err(ValidationError::AlreadyExists("glm".to_string()))
        );
        let err = create_configuration(tmp.path(), "glm", &Template::Empty).unwrap_err();
        assert!(matches!(err, SwitchError::Validation(ValidationError::AlreadyExists(_))));
    }

    #[test]
    fn empty_template_writes_braces() {
        let tmp = tempdir().unwrap();
        let config = create_configuration(tmp.path(), "foo", &Template::Empty).unwrap();
        assert_eq!(fs::read(&config.path).unwrap(), b"{}");
    }

    #[test]
    fn copy_template_is_byte_identical() {
        let tmp = tempdir().unwrap();
        let raw = "{\n  \"env\": { \"MODEL\": \"x\" }\n}\r\n";
        touch(tmp.path(), "settings.json", raw);
        let source = find_configuration(tmp.path(), "default").unwrap();

        let copy = create_configuration(tmp.path(), "copy", &Template::CopyFrom(source)).unwrap();
        assert_eq!(fs::read(&copy.path).unwrap(), raw.as_bytes());
    }

    #[test]
    fn copy_from_vanished_file_is_an_io_error() {
        let tmp = tempdir().unwrap();
        let ghost = Configuration { name: "ghost".into(), path: tmp.path().join("settings.ghost.json") };
        let err = create_configuration(tmp.path(), "new", &Template::CopyFrom(ghost)).unwrap_err();
        assert!(matches!(err, SwitchError::Io { .. }));
        assert!(!tmp.path().join("settings.new.json").exists());
    }

    #[test]
    fn create_makes_missing_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let config = create_configuration(&dir, "foo", &Template::Empty).unwrap();
        assert_eq!(config.path, dir.join("settings.foo.json"));
        assert!(config.path.is_file());
    }

    #[test]
    fn create_list_delete_round_trip() {
        let tmp = tempdir().unwrap();
        let created = create_configuration(tmp.path(), "foo", &Template::Empty).unwrap();

        let listed = find_configuration(tmp.path(), "foo").unwrap();
        assert_eq!(listed, created);
        assert_eq!(listed.path, tmp.path().join("settings.foo.json"));

        delete_configuration(&listed).unwrap();
        assert!(find_configuration(tmp.path(), "foo").is_none());
    }

    #[test]
    fn deleting_missing_file_is_an_io_error() {
        let tmp = tempdir().unwrap();
        let ghost = Configuration { name: "ghost".into(), path: tmp.path().join("settings.ghost.json") };
        assert!(matches!(delete_configuration(&ghost), Err(SwitchError::Io { .. })));
    }
}
