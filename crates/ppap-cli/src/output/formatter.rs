//! Output formatter trait for CLI results.

use ppap_core::CreationReport;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a successful run.
    ///
    /// `generated_password` is set only when the user has to be told the
    /// password.
    fn format_creation_result(
        &self,
        archive_name: &str,
        report: &CreationReport,
        generated_password: Option<&str>,
    );

    /// Format warning message
    fn format_warning(&self, message: &str);

    /// Format version string
    fn format_version(&self, version: &str);
}
