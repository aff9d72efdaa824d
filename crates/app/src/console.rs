use std::io::{self, Write};

use civics_core::model::Theme;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const RESET: &str = "\x1b[0m";

/// Line-oriented terminal I/O. `None` from a prompt means stdin was closed.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
    theme: Theme,
}

impl Console {
    pub fn stdin(theme: Theme) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            theme,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn accent(&self) -> &'static str {
        match self.theme {
            Theme::Light => "\x1b[34m",
            Theme::Dark => "\x1b[96m",
        }
    }

    pub fn header(&self, title: &str) {
        println!();
        println!("{}== {title} =={RESET}  ({} theme)", self.accent(), self.theme);
    }

    pub fn line(&self, text: impl AsRef<str>) {
        println!("{}", text.as_ref());
    }

    pub fn success(&self, text: impl AsRef<str>) {
        println!("\x1b[32m{}{RESET}", text.as_ref());
    }

    pub fn failure(&self, text: impl AsRef<str>) {
        println!("\x1b[31m{}{RESET}", text.as_ref());
    }

    /// Print `label` and read one trimmed line.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}{label}{RESET} ", self.accent());
        io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Yes/no question; anything but `y`/`yes` is a no.
    pub async fn confirm(&mut self, label: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{label} [y/N]")).await?;
        Ok(answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    /// Read a 1-based menu choice; `None` on closed input.
    pub async fn choose(&mut self, label: &str, options: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(raw) = self.prompt(label).await? else {
                return Ok(None);
            };
            match raw.parse::<usize>() {
                Ok(choice) if (1..=options).contains(&choice) => return Ok(Some(choice)),
                _ => self.failure(format!("Pick a number between 1 and {options}.")),
            }
        }
    }
}
