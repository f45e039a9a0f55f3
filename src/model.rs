use std::{fmt, path::PathBuf};

/// Name given to the bare `settings.json` file.
pub const DEFAULT_NAME: &str = "default";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Configuration {
    pub name: String,
    pub path: PathBuf,
}

impl Configuration {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_NAME
    }

    pub fn sort_key(&self) -> (u8, String) {
        // "default" always leads, everything else by name
        let rank = if self.is_default() { 0 } else { 1 };
        (rank, self.name.clone())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// File name backing the configuration called `name`.
pub fn file_name_for(name: &str) -> String {
    if name == DEFAULT_NAME {
        "settings.json".to_string()
    } else {
        format!("settings.{name}.json")
    }
}

/// One entry of the main menu.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Choice {
    Launch(Configuration),
    Create,
    Edit,
    Delete,
    Exit,
}

impl Choice {
    pub fn label(&self) -> String {
        match self {
            Choice::Launch(config) => config.name.clone(),
            Choice::Create => "Create new".to_string(),
            Choice::Edit => "Edit".to_string(),
            Choice::Delete => "Delete".to_string(),
            Choice::Exit => "Exit".to_string(),
        }
    }
}

/// Starting content for a new configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Template {
    Empty,
    CopyFrom(Configuration),
}

/// Where the menu loop ended up.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Launch(Configuration),
    Exit,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_to_bare_settings_file() {
        assert_eq!(file_name_for("default"), "settings.json");
        assert_eq!(file_name_for("glm"), "settings.glm.json");
    }

    #[test]
    fn default_sorts_before_names_that_compare_lower() {
        let default = Configuration { name: "default".into(), path: PathBuf::from("settings.json") };
        let alpha = Configuration { name: "a".into(), path: PathBuf::from("settings.a.json") };
        assert!(default.sort_key() < alpha.sort_key());
    }
}
