//! Prompt and print abstraction used by the interactive workflows.
//!
//! Workflows never touch stdin/stdout directly; they talk to a [`Console`]
//! so tests can script operator input and inspect the transcript.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cli::ColorChoice;

/// Semantic colour of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Prompt,
    Warning,
    Success,
    Failure,
    Heading,
}

/// Renders tones as terminal colours, or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Theme {
    colored: bool,
}

impl Theme {
    pub(crate) const fn new(colored: bool) -> Self {
        Self { colored }
    }

    #[cfg(test)]
    pub(crate) const fn plain() -> Self {
        Self::new(false)
    }

    /// Pick a theme from `--color` and whether stdout is an interactive
    /// terminal that has not opted out via `NO_COLOR`.
    pub(crate) const fn from_choice(choice: ColorChoice, color_capable: bool) -> Self {
        match choice {
            ColorChoice::Always => Self::new(true),
            ColorChoice::Never => Self::new(false),
            ColorChoice::Auto => Self::new(color_capable),
        }
    }

    pub(crate) const fn is_colored(self) -> bool {
        self.colored
    }

    pub(crate) fn paint(self, tone: Tone, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }
        match tone {
            Tone::Plain => text.to_string(),
            Tone::Prompt | Tone::Success => text.green().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Failure => text.red().to_string(),
            Tone::Heading => text.cyan().bold().to_string(),
        }
    }
}

/// Line-oriented operator I/O.
pub(crate) trait Console: Send {
    /// Print one line.
    fn say(&mut self, tone: Tone, message: &str);

    /// Print `prompt` without a newline and read one line of input.
    ///
    /// End of input yields an empty string, which every prompt treats as
    /// "nothing selected" or "no".
    fn ask(&mut self, tone: Tone, prompt: &str) -> io::Result<String>;
}

/// Console bound to the process's stdin and stdout.
pub(crate) struct StdConsole {
    theme: Theme,
}

impl StdConsole {
    pub(crate) const fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Console for StdConsole {
    fn say(&mut self, tone: Tone, message: &str) {
        println!("{}", self.theme.paint(tone, message));
    }

    fn ask(&mut self, tone: Tone, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", self.theme.paint(tone, prompt))?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedConsole;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_text_untouched() {
        let theme = Theme::plain();
        for tone in [
            Tone::Plain,
            Tone::Prompt,
            Tone::Warning,
            Tone::Success,
            Tone::Failure,
            Tone::Heading,
        ] {
            assert_eq!(theme.paint(tone, "hello"), "hello");
        }
    }

    #[test]
    fn color_choice_overrides_terminal_detection() {
        assert!(Theme::from_choice(ColorChoice::Always, false).is_colored());
        assert!(!Theme::from_choice(ColorChoice::Never, true).is_colored());
        assert!(Theme::from_choice(ColorChoice::Auto, true).is_colored());
        assert!(!Theme::from_choice(ColorChoice::Auto, false).is_colored());
    }

    #[test]
    fn scripted_console_replays_inputs_then_eof() {
        let mut console = ScriptedConsole::new(&["1,2"]);
        console.say(Tone::Heading, "Movies:");
        let first = console.ask(Tone::Prompt, "Select: ").expect("scripted input");
        let second = console.ask(Tone::Prompt, "Again: ").expect("scripted input");

        assert_eq!(first, "1,2\n");
        assert_eq!(second, "");
        assert_eq!(console.lines(), ["Movies:", "Select: ", "Again: "]);
        assert_eq!(console.prompts_remaining(), 0);
    }
}
