use std::{
    borrow::Cow,
    io::{self, BufRead, Write},
};

use owo_colors::OwoColorize;
use skim::prelude::*;
use skim_tuikit::prelude::{Attr, Color, Effect};

use crate::error::{Result, SwitchError};

/// One selectable line in a list prompt.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entry {
    pub label: String,
    pub detail: Option<String>,
}

impl Entry {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), detail: None }
    }

    pub fn with_detail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { label: label.into(), detail: Some(detail.into()) }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Notice {
    Success,
    Info,
    Error,
}

/// Everything the menu needs from the terminal.
///
/// Each method blocks until the user answers. Backing out of any prompt
/// returns [`SwitchError::Cancelled`].
pub trait Prompter {
    /// Index into `entries` of the chosen line.
    fn select(&mut self, message: &str, entries: &[Entry]) -> Result<usize>;

    fn input(&mut self, message: &str) -> Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    fn report(&mut self, notice: Notice, message: &str);
}

/// Skim for list selection, plain line reads for text and yes/no.
pub struct TerminalPrompter {
    color_spec: Option<String>,
    colors: bool,
}

impl TerminalPrompter {
    pub fn new(color_spec: Option<String>) -> Self {
        let colors = std::env::var("NO_COLOR").is_err();
        Self { color_spec, colors }
    }

    fn read_line(&self) -> Result<String> {
        io::stdout().flush().map_err(|e| SwitchError::Prompt(e.to_string()))?;
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| SwitchError::Prompt(e.to_string()))?;
        // Ctrl-D
        if read == 0 {
            return Err(SwitchError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}

struct MenuItem {
    text: String,
    display: AnsiString<'static>,
    index: usize,
}

impl SkimItem for MenuItem {
    fn text(&self) -> Cow<str> { Cow::Borrowed(&self.text) }
    fn output(&self) -> Cow<str> { Cow::Owned(self.index.to_string()) }
    fn get_index(&self) -> usize { self.index }
    fn set_index(&mut self, index: usize) { self.index = index; }

    fn display<'a>(&'a self, context: DisplayContext<'a>) -> AnsiString<'a> {
        let highlight = context.highlight_attr;
        let mut line = self.display.clone();
        line.override_attrs(
            match_spans(&context.matches, context.text)
                .into_iter()
                .map(|span| (highlight, span))
                .collect(),
        );
        line
    }
}

/// Character spans skim matched, whatever unit it reported them in.
fn match_spans(matches: &Matches<'_>, text: &str) -> Vec<(u32, u32)> {
    let char_at = |byte: usize| text[..byte].chars().count() as u32;
    match *matches {
        Matches::None => Vec::new(),
        Matches::CharIndices(indices) => indices.iter().map(|&i| (i as u32, i as u32 + 1)).collect(),
        Matches::CharRange(start, end) => vec![(start as u32, end as u32)],
        Matches::ByteRange(start, end) => vec![(char_at(start), char_at(end))],
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, message: &str, entries: &[Entry]) -> Result<usize> {
        let width = entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);

        loop {
            let (tx, rx): (SkimItemSender, SkimItemReceiver) = unbounded();
            for (index, entry) in entries.iter().enumerate() {
                let (text, display) = build_colored_line(entry, width, self.colors);
                let _ = tx.send(Arc::new(MenuItem { text, display, index }));
            }
            drop(tx);

            let mut options = SkimOptionsBuilder::default()
                .height("50%".to_string())
                .multi(false)
                .reverse(true)
                .prompt(format!("{message} "))
                .build()
                .map_err(|e| SwitchError::Prompt(e.to_string()))?;

            if let Some(spec) = &self.color_spec {
                options.color = Some(spec.clone());
            } else if self.colors {
                options.color = Some("dark".to_string());
            }

            let out = Skim::run_with(&options, Some(rx))
                .ok_or_else(|| SwitchError::Prompt("selector exited without a result".to_string()))?;
            if out.is_abort {
                return Err(SwitchError::Cancelled);
            }
            let picked = out
                .selected_items
                .first()
                .and_then(|item| item.output().parse::<usize>().ok())
                .filter(|&i| i < entries.len());
            // Enter on an empty filter result: ask again
            if let Some(index) = picked {
                return Ok(index);
            }
        }
    }

    fn input(&mut self, message: &str) -> Result<String> {
        if self.colors {
            print!("{} {} ", "?".green().bold(), message.bold());
        } else {
            print!("? {message} ");
        }
        self.read_line()
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            if self.colors {
                print!("{} {} {} ", "?".green().bold(), message.bold(), hint.dimmed());
            } else {
                print!("? {message} {hint} ");
            }
            match self.read_line()?.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn report(&mut self, notice: Notice, message: &str) {
        if !self.colors {
            match notice {
                Notice::Error => eprintln!("{message}"),
                Notice::Success | Notice::Info => println!("{message}"),
            }
            return;
        }
        match notice {
            Notice::Success => println!("{} {}", "✔".green(), message),
            Notice::Info => println!("{} {}", "ℹ".cyan(), message),
            Notice::Error => eprintln!("{} {}", "✖".red(), message.red()),
        }
    }
}

fn build_colored_line(entry: &Entry, width: usize, seg_colors: bool) -> (String, AnsiString<'static>) {
    let base = match &entry.detail {
        Some(detail) => format!("{label:<width$}  {detail}", label = entry.label),
        None => entry.label.clone(),
    };

    if !seg_colors {
        return (base.clone(), base.into());
    }

    let mut fragments: Vec<(Attr, (u32, u32))> = Vec::new();
    let label_len = entry.label.chars().count();
    let label_attr = Attr { fg: Color::Rgb(0xDA, 0x68, 0xEC), bg: Color::Default, effect: Effect::BOLD };
    fragments.push((label_attr, (0, label_len as u32)));

    if entry.detail.is_some() {
        let start = width.max(label_len) + 2;
        let end = base.chars().count();
        let detail_attr = Attr { fg: Color::AnsiValue(8), bg: Color::Default, effect: Effect::empty() };
        fragments.push((detail_attr, (start as u32, end as u32)));
    }

    let ansi = AnsiString::new_string(base.clone(), fragments);
    (base, ansi)
}
