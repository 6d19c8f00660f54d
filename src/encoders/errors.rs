use std::fmt;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contains a character not in the dictionary
    InvalidCharacter {
        char: char,
        position: usize,
        input: String,
        valid_chars: String,
    },
    /// The padding is malformed or incorrect
    InvalidPadding,
    /// Invalid length for the encoding format
    InvalidLength {
        actual: usize,
        expected: String,
        hint: String,
    },
}

impl DecodeError {
    /// Create an InvalidCharacter error with context
    pub fn invalid_character(c: char, position: usize, input: &str, valid_chars: &str) -> Self {
        // Embedded dictionaries are huge; only keep the start for display
        let display_input = if input.chars().count() > 60 {
            format!("{}...", input.chars().take(60).collect::<String>())
        } else {
            input.to_string()
        };

        DecodeError::InvalidCharacter {
            char: c,
            position,
            input: display_input,
            valid_chars: valid_chars.to_string(),
        }
    }

    /// Create an InvalidLength error
    pub fn invalid_length(
        actual: usize,
        expected: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        DecodeError::InvalidLength {
            actual,
            expected: expected.into(),
            hint: hint.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            DecodeError::InvalidCharacter {
                char: c,
                position,
                input,
                valid_chars,
            } => {
                write_prefix(f, "error", use_color)?;
                writeln!(f, "invalid character '{}' at position {}", c, position)?;
                writeln!(f)?;

                // Caret only lines up when the error falls inside the shown prefix
                if *position < 60 {
                    writeln!(f, "  {}", input)?;
                    write!(f, "  {}", " ".repeat(*position))?;
                    if use_color {
                        writeln!(f, "\x1b[1;31m^\x1b[0m")?;
                    } else {
                        writeln!(f, "^")?;
                    }
                    writeln!(f)?;
                }

                write_prefix(f, "hint", use_color)?;
                write!(f, "valid characters: {}", valid_chars)
            }
            DecodeError::InvalidPadding => {
                write_prefix(f, "error", use_color)?;
                writeln!(f, "invalid padding")?;
                writeln!(f)?;
                write_prefix(f, "hint", use_color)?;
                write!(
                    f,
                    "check for missing or incorrect '=' characters at end of input"
                )
            }
            DecodeError::InvalidLength {
                actual,
                expected,
                hint,
            } => {
                write_prefix(f, "error", use_color)?;
                writeln!(f, "invalid length for decode")?;
                writeln!(f)?;
                writeln!(f, "  input is {} characters, expected {}", actual, expected)?;
                writeln!(f)?;
                write_prefix(f, "hint", use_color)?;
                write!(f, "{}", hint)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Writes an `error: ` / `hint: ` style prefix, bold red or cyan when colored.
pub(crate) fn write_prefix(f: &mut fmt::Formatter<'_>, label: &str, use_color: bool) -> fmt::Result {
    if use_color {
        let code = if label == "hint" { "1;36" } else { "1;31" };
        write!(f, "\x1b[{}m{}:\x1b[0m ", code, label)
    } else {
        write!(f, "{}: ", label)
    }
}

/// Turns off ANSI colors for the rest of the process (`--no-color`).
pub fn disable_color() {
    COLOR_DISABLED.store(true, Ordering::Relaxed);
}

fn color_allowed() -> bool {
    // Respect NO_COLOR environment variable
    !COLOR_DISABLED.load(Ordering::Relaxed) && std::env::var_os("NO_COLOR").is_none()
}

/// Check if colored output should be used on stderr
pub fn should_use_color() -> bool {
    color_allowed() && std::io::stderr().is_terminal()
}

/// Check if colored output should be used on stdout
pub fn should_use_color_stdout() -> bool {
    color_allowed() && std::io::stdout().is_terminal()
}
