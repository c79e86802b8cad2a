//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use console::Term;
use console::style;
use ppap_core::CreationReport;

pub struct HumanFormatter {
    use_colors: bool,
    stdout: Term,
    stderr: Term,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn success_line(&self, text: &str) -> String {
        if self.use_colors {
            style(text).green().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(
        &self,
        archive_name: &str,
        report: &CreationReport,
        generated_password: Option<&str>,
    ) {
        for warning in &report.warnings {
            self.format_warning(warning);
        }

        let _ = self
            .stdout
            .write_line(&self.success_line(&created_line(archive_name)));
        if let Some(password) = generated_password {
            let _ = self
                .stdout
                .write_line(&self.success_line(&password_line(password)));
        }
    }

    fn format_warning(&self, message: &str) {
        let line = if self.use_colors {
            style(message).yellow().to_string()
        } else {
            message.to_string()
        };
        let _ = self.stderr.write_line(&line);
    }

    fn format_version(&self, version: &str) {
        let _ = self.stdout.write_line(version);
    }
}

fn created_line(archive_name: &str) -> String {
    format!("Created: {archive_name}")
}

fn password_line(password: &str) -> String {
    format!("Password is: {password}")
}
