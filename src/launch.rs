use std::{
    path::PathBuf,
    process::Command,
    sync::atomic::AtomicBool,
};

use tracing::{debug, info};

use crate::error::{Result, SwitchError};
use crate::model::Configuration;
use crate::signal::{self, Handoff};

/// Runs the target program against a chosen configuration.
#[derive(Debug, Clone)]
pub struct ProgramLauncher {
    program: String,
    flag: String,
    handed_off: &'static AtomicBool,
}

impl ProgramLauncher {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self { program: program.into(), flag: flag.into(), handed_off: &signal::HANDED_OFF }
    }

    pub fn command(&self, config: &Configuration) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag).arg(absolute(&config.path));
        cmd
    }

    /// Hands the terminal to the program and returns its exit code.
    ///
    /// A child that reports no code (killed by a signal) counts as 0.
    pub fn run(&self, config: &Configuration) -> Result<i32> {
        info!(program = %self.program, %config, "launching");
        let mut cmd = self.command(config);

        let status = {
            let _handoff = Handoff::begin(self.handed_off);
            cmd.status()
        };

        let status = status.map_err(|e| SwitchError::Spawn { command: self.program.clone(), source: e })?;
        debug!(code = ?status.code(), "program exited");
        Ok(status.code().unwrap_or(0))
    }
}

fn absolute(path: &std::path::Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
