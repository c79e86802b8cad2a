//! Archive creation, the only command.

use crate::cli::Cli;
use crate::console::TermConsole;
use crate::error::with_hints;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use ppap_core::ArchiveOptions;
use ppap_core::NoopProgress;
use ppap_core::ProgressCallback;
use ppap_core::Settings;
use ppap_core::classify_inputs;
use ppap_core::collect_entries;
use ppap_core::create_archive;
use ppap_core::resolve_archive_name;
use ppap_core::resolve_password;
use ppap_core::settings;
use std::path::Path;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let settings_path = settings::default_path();
    let settings_path = settings_path.as_deref();

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let archive_name = with_hints(
        resolve_archive_name(cli.paths.as_slice(), &cwd),
        settings_path,
    )?;
    let inputs = with_hints(classify_inputs(cli.paths.as_slice()), settings_path)?;

    let settings = with_hints(Settings::load(), settings_path)?;
    tracing::debug!(from_file = settings.has_file(), "settings loaded");
    let mut console = TermConsole::new();
    let password = with_hints(
        resolve_password(cli.password, &settings, &mut console),
        settings_path,
    )?;

    let charset = with_hints(settings.charset(), settings_path)?;
    tracing::debug!(
        charset = charset.value.name(),
        origin = ?charset.origin,
        "entry name charset"
    );
    let ignore = with_hints(settings.ignore_pattern(), settings_path)?;

    let plan = with_hints(collect_entries(&inputs, ignore.as_ref()), settings_path)?;
    let options = ArchiveOptions::new(password.as_bytes()).with_charset(charset.value);

    let mut progress: Box<dyn ProgressCallback> = if CliProgress::should_show() {
        Box::new(CliProgress::new(plan.len()))
    } else {
        Box::new(NoopProgress)
    };
    let output = Path::new(&archive_name);
    let report = with_hints(
        create_archive(output, &plan, &options, progress.as_mut()),
        settings_path,
    )
    .with_context(|| format!("failed to create {archive_name}"))?;
    drop(progress);
    tracing::debug!(
        entries = report.total_entries(),
        ratio = report.compression_ratio(),
        duration = ?report.duration,
        "archive complete"
    );

    let generated = password.is_generated().then(|| password.as_str());
    formatter.format_creation_result(&archive_name, &report, generated);

    Ok(())
}
