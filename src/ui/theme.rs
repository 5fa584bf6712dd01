use owo_colors::Style;
use std::sync::OnceLock;

static STDOUT: OnceLock<Theme> = OnceLock::new();
static STDERR: OnceLock<Theme> = OnceLock::new();

/// Styles for status lines
#[derive(Debug, Clone)]
pub struct Theme {
    /// Headers and labels
    pub accent: Style,
    pub good: Style,
    /// Errors and warnings
    pub bad: Style,
    pub dim: Style,
}

impl Theme {
    /// Colored on a terminal, plain otherwise
    pub fn for_terminal(is_term: bool) -> Self {
        if !is_term {
            return Self {
                accent: Style::new(),
                good: Style::new(),
                bad: Style::new(),
                dim: Style::new(),
            };
        }
        Self {
            accent: Style::new().cyan().bold(),
            good: Style::new().green().bold(),
            bad: Style::new().red().bold(),
            dim: Style::new().bright_black(),
        }
    }
}

/// Theme for lines printed to stdout
pub fn theme() -> &'static Theme {
    STDOUT.get_or_init(|| Theme::for_terminal(console::Term::stdout().is_term()))
}

/// Theme for lines printed to stderr
pub fn err_theme() -> &'static Theme {
    STDERR.get_or_init(|| Theme::for_terminal(console::Term::stderr().is_term()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        let plain = Theme::for_terminal(false);
        assert_eq!("ok".style(plain.good).to_string(), "ok");
        assert_eq!("x".style(plain.dim).to_string(), "x");
    }

    #[test]
    fn test_terminal_theme_colors() {
        let colored = Theme::for_terminal(true);
        assert!("ok".style(colored.good).to_string().contains("\u{1b}["));
    }
}
