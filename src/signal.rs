//! Process-wide Ctrl-C handling.
//!
//! Interrupting at any point ends the program successfully. The one exception
//! is while the target program owns the terminal: the interrupt belongs to it.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::debug;

/// Set while the target program owns the terminal.
pub static HANDED_OFF: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Interrupt {
    Exit,
    Ignore,
}

pub fn on_interrupt(handed_off: &AtomicBool) -> Interrupt {
    if handed_off.load(Ordering::SeqCst) {
        Interrupt::Ignore
    } else {
        Interrupt::Exit
    }
}

pub fn install() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;

    std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    match on_interrupt(&HANDED_OFF) {
                        Interrupt::Ignore => debug!("interrupt left to child process"),
                        Interrupt::Exit => {
                            println!();
                            println!("Bye!");
                            std::process::exit(0);
                        }
                    }
                }
            })
        })
        .context("spawning signal listener")?;
    Ok(())
}

/// Marks a handoff for as long as it lives.
pub struct Handoff<'a> {
    flag: &'a AtomicBool,
}

impl<'a> Handoff<'a> {
    pub fn begin(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for Handoff<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
