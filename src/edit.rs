use std::{io, path::Path, process::Command};

use tracing::{debug, warn};

use crate::error::{Result, SwitchError};

/// Status the platform shell exits with when the command is not found.
#[cfg(not(windows))]
const COMMAND_NOT_FOUND: i32 = 127;
#[cfg(windows)]
const COMMAND_NOT_FOUND: i32 = 9009;

/// An external editor, invoked as `command <path>`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Editor {
    pub label: String,
    pub command: String,
}

impl Editor {
    fn known(label: &str, command: &str) -> Self {
        Self { label: label.to_string(), command: command.to_string() }
    }

    /// First word of the command, the thing that has to be on PATH.
    pub fn program(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or_default()
    }
}

/// Editors in order of preference. GUI editors need their wait flag so the
/// call blocks until the window closes.
pub fn known_editors() -> Vec<Editor> {
    vec![
        Editor::known("nano", "nano"),
        Editor::known("vim", "vim"),
        Editor::known("Visual Studio Code", "code --wait"),
        Editor::known("Cursor", "cursor --wait"),
    ]
}

pub trait EditorLauncher {
    fn available(&self) -> Vec<Editor>;

    /// Blocks until the editor exits.
    fn open(&self, editor: &Editor, path: &Path) -> Result<()>;
}

/// Launches real editors through the platform shell.
pub struct ShellEditors {
    preferred: Option<String>,
}

impl ShellEditors {
    pub fn new(preferred: Option<String>) -> Self {
        Self { preferred }
    }
}

impl EditorLauncher for ShellEditors {
    fn available(&self) -> Vec<Editor> {
        let candidates = match &self.preferred {
            Some(cmd) => vec![Editor { label: cmd.clone(), command: cmd.clone() }],
            None => known_editors(),
        };
        candidates
            .into_iter()
            .filter(|e| {
                let found = is_installed(e.program());
                debug!(editor = %e.command, found, "probed editor");
                found
            })
            .collect()
    }

    fn open(&self, editor: &Editor, path: &Path) -> Result<()> {
        debug!(editor = %editor.command, path = %path.display(), "opening editor");
        let status = shell_command(&editor.command, path)
            .status()
            .map_err(|e| SwitchError::Spawn { command: editor.command.clone(), source: e })?;

        if status.code() == Some(COMMAND_NOT_FOUND) {
            return Err(SwitchError::Spawn {
                command: editor.command.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "command not found"),
            });
        }
        if !status.success() {
            warn!(editor = %editor.command, code = ?status.code(), "editor exited unsuccessfully");
        }
        Ok(())
    }
}

/// `which` honours PATHEXT on Windows and the executable bit elsewhere.
fn is_installed(program: &str) -> bool {
    !program.is_empty() && which::which(program).is_ok()
}

#[cfg(not(windows))]
fn shell_command(editor_cmd: &str, path: &Path) -> Command {
    // Path goes in as $1 so the shell never re-parses it
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(format!("{editor_cmd} \"$1\"")).arg("sh").arg(path);
    cmd
}

#[cfg(windows)]
fn shell_command(editor_cmd: &str, path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").args(editor_cmd.split_whitespace()).arg(path);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_is_first_word_of_command() {
        let code = Editor::known("Visual Studio Code", "code --wait");
        assert_eq!(code.program(), "code");
        assert_eq!(Editor::known("nano", "nano").program(), "nano");
    }

    #[test]
    fn preference_order_starts_with_terminal_editors() {
        let commands: Vec<String> = known_editors().into_iter().map(|e| e.command).collect();
        assert_eq!(commands, vec!["nano", "vim", "code --wait", "cursor --wait"]);
    }

    #[cfg(unix)]
    #[test]
    fn preferred_editor_replaces_the_known_list() {
        let editors = ShellEditors::new(Some("sh -e".to_string()));
        let available = editors.available();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].command, "sh -e");
    }

    #[test]
    fn missing_preferred_editor_is_not_offered() {
        let editors = ShellEditors::new(Some("definitely-not-an-editor-3f9a1c --wait".to_string()));
        assert!(editors.available().is_empty());
    }

    #[test]
    fn unknown_program_is_not_installed() {
        assert!(!is_installed("definitely-not-an-editor-3f9a1c"));
        assert!(!is_installed(""));
    }

    #[cfg(unix)]
    #[test]
    fn shell_command_passes_path_as_positional_argument() {
        let cmd = shell_command("code --wait", Path::new("/tmp/a b/settings.json"));
        assert_eq!(cmd.get_program(), "sh");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-c", "code --wait \"$1\"", "sh", "/tmp/a b/settings.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn opening_runs_the_command_to_completion() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("settings.json");
        std::fs::write(&target, "{}").unwrap();
        // `true` ignores its argument and exits 0
        let editor = Editor::known("true", "true");
        assert!(ShellEditors::new(None).open(&editor, &target).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn command_missing_in_shell_is_a_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("settings.json");
        std::fs::write(&target, "{}").unwrap();
        let editor = Editor::known("ghost", "definitely-not-an-editor-3f9a1c");

        let err = ShellEditors::new(None).open(&editor, &target).unwrap_err();
        assert!(matches!(err, SwitchError::Spawn { ref command, .. } if command == "definitely-not-an-editor-3f9a1c"));
    }

    #[cfg(unix)]
    #[test]
    fn editor_failing_for_other_reasons_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("settings.json");
        std::fs::write(&target, "{}").unwrap();
        let editor = Editor::known("false", "false");
        assert!(ShellEditors::new(None).open(&editor, &target).is_ok());
    }
}
