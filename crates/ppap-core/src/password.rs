//! Archive password resolution.
//!
//! A password is entered interactively when requested and possible,
//! otherwise taken from the settings file, otherwise generated.

use crate::Result;
use crate::settings::Settings;
use rand::Rng;
use std::fmt;
use std::io;

/// Length of generated passwords.
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

/// Lowest character of generated passwords (`!`).
pub const PASSWORD_CHAR_MIN: u8 = 0x21;

/// Highest character of generated passwords (`~`).
pub const PASSWORD_CHAR_MAX: u8 = 0x7E;

/// Warning emitted when interactive entry is requested without a terminal.
pub const NO_CONSOLE_WARNING: &str = "No console available. You cannot input password.";

/// Warning emitted when the confirmation does not match.
pub const WRONG_PASSWORD_WARNING: &str = "Wrong password.";

/// Where a password came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordOrigin {
    /// Typed by the user and confirmed.
    Interactive,
    /// Read from the settings file.
    Config,
    /// Generated at random. The user must be shown this password.
    Generated,
}

/// A password together with its origin.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    secret: String,
    origin: PasswordOrigin,
}

impl Password {
    /// Wraps a password.
    #[must_use]
    pub fn new(secret: impl Into<String>, origin: PasswordOrigin) -> Self {
        Self {
            secret: secret.into(),
            origin,
        }
    }

    /// The password text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.secret
    }

    /// The password bytes fed to the cipher.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Where the password came from.
    #[must_use]
    pub const fn origin(&self) -> PasswordOrigin {
        self.origin
    }

    /// Returns `true` if the password was generated and must be displayed.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.origin == PasswordOrigin::Generated
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("secret", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// The interactive channel used to read passwords.
pub trait SecretConsole {
    /// Returns whether a user can be prompted.
    fn is_interactive(&self) -> bool;

    /// Prompts for a line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Reports a non-fatal condition to the user.
    fn warn(&mut self, message: &str);
}

/// Resolves the password for this run.
///
/// With `interactive` set and an interactive console available, the user
/// is asked for the password twice until both entries agree. Without a
/// console a warning is emitted and resolution falls back to the settings
/// file, then to a generated password.
///
/// # Errors
///
/// Returns an I/O error if reading from the console fails.
pub fn resolve_password(
    interactive: bool,
    settings: &Settings,
    console: &mut dyn SecretConsole,
) -> Result<Password> {
    if interactive {
        if console.is_interactive() {
            return Ok(prompt_until_confirmed(console)?);
        }
        console.warn(NO_CONSOLE_WARNING);
    }

    if let Some(secret) = settings.password() {
        tracing::debug!("using password from settings file");
        return Ok(Password::new(secret, PasswordOrigin::Config));
    }

    tracing::debug!("generating password");
    Ok(Password::new(
        generate_password(),
        PasswordOrigin::Generated,
    ))
}

fn prompt_until_confirmed(console: &mut dyn SecretConsole) -> io::Result<Password> {
    loop {
        let entered = console.read_secret("Enter password: ")?;
        let verified = console.read_secret("Verify password: ")?;
        if entered == verified {
            return Ok(Password::new(entered, PasswordOrigin::Interactive));
        }
        console.warn(WRONG_PASSWORD_WARNING);
    }
}

/// Generates a random password from the thread-local generator.
#[must_use]
pub fn generate_password() -> String {
    generate_password_with(&mut rand::rng())
}

/// Generates a password of printable ASCII characters from `rng`.
///
/// # Examples
///
/// ```
/// use ppap_core::password::generate_password_with;
///
/// let password = generate_password_with(&mut rand::rng());
/// assert_eq!(password.len(), 16);
/// assert!(password.bytes().all(|b| (b'!'..=b'~').contains(&b)));
/// ```
pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| char::from(rng.random_range(PASSWORD_CHAR_MIN..=PASSWORD_CHAR_MAX)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    struct ScriptedConsole {
        interactive: bool,
        answers: VecDeque<String>,
        prompts: Vec<String>,
        warnings: Vec<String>,
    }

    impl ScriptedConsole {
        fn new(interactive: bool, answers: &[&str]) -> Self {
            Self {
                interactive,
                answers: answers.iter().map(ToString::to_string).collect(),
                prompts: Vec::new(),
                warnings: Vec::new(),
            }
        }
    }

    impl SecretConsole for ScriptedConsole {
        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
            self.prompts.push(prompt.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
        }

        fn warn(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }
    }

    fn settings_with_password(password: &str) -> (TempDir, Settings) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".ppaprc");
        fs::write(&path, format!("password={password}\n")).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        (temp, settings)
    }

    #[test]
    fn test_interactive_confirmed_first_time() {
        let mut console = ScriptedConsole::new(true, &["hunter2", "hunter2"]);
        let password = resolve_password(true, &Settings::empty(), &mut console).unwrap();

        assert_eq!(password.as_str(), "hunter2");
        assert_eq!(password.origin(), PasswordOrigin::Interactive);
        assert!(!password.is_generated());
        assert_eq!(console.prompts, vec!["Enter password: ", "Verify password: "]);
        assert!(console.warnings.is_empty());
    }

    #[test]
    fn test_interactive_mismatch_retries() {
        let mut console = ScriptedConsole::new(true, &["one", "two", "abc", "abd", "ok", "ok"]);
        let password = resolve_password(true, &Settings::empty(), &mut console).unwrap();

        assert_eq!(password.as_str(), "ok");
        assert_eq!(console.warnings, vec![WRONG_PASSWORD_WARNING; 2]);
        assert_eq!(console.prompts.len(), 6);
    }

    #[test]
    fn test_interactive_read_error_is_fatal() {
        let mut console = ScriptedConsole::new(true, &["only-one"]);
        let err = resolve_password(true, &Settings::empty(), &mut console).unwrap_err();
        assert!(matches!(err, crate::PpapError::Io(_)));
    }

    #[test]
    fn test_interactive_ignores_settings_password() {
        let (_temp, settings) = settings_with_password("from-file");
        let mut console = ScriptedConsole::new(true, &["typed", "typed"]);
        let password = resolve_password(true, &settings, &mut console).unwrap();
        assert_eq!(password.as_str(), "typed");
    }

    #[test]
    fn test_no_console_warns_and_falls_back_to_settings() {
        let (_temp, settings) = settings_with_password("from-file");
        let mut console = ScriptedConsole::new(false, &[]);
        let password = resolve_password(true, &settings, &mut console).unwrap();

        assert_eq!(password.as_str(), "from-file");
        assert_eq!(password.origin(), PasswordOrigin::Config);
        assert_eq!(console.warnings, vec![NO_CONSOLE_WARNING]);
        assert!(console.prompts.is_empty());
    }

    #[test]
    fn test_no_console_warns_and_generates() {
        let mut console = ScriptedConsole::new(false, &[]);
        let password = resolve_password(true, &Settings::empty(), &mut console).unwrap();

        assert!(password.is_generated());
        assert_eq!(password.as_str().len(), GENERATED_PASSWORD_LENGTH);
        assert_eq!(console.warnings.len(), 1);
    }

    #[test]
    fn test_non_interactive_never_prompts() {
        let mut console = ScriptedConsole::new(true, &["unused", "unused"]);
        let password = resolve_password(false, &Settings::empty(), &mut console).unwrap();

        assert!(password.is_generated());
        assert!(console.prompts.is_empty());
        assert!(console.warnings.is_empty());
    }

    #[test]
    fn test_generated_password_charset() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let password = generate_password_with(&mut rng);
            assert_eq!(password.len(), 16);
            assert!(
                password
                    .bytes()
                    .all(|b| (PASSWORD_CHAR_MIN..=PASSWORD_CHAR_MAX).contains(&b))
            );
        }
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let password = Password::new("topsecret", PasswordOrigin::Config);
        let debug = format!("{password:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("Config"));
    }
}
