//! Expansion of validated inputs into the list of archive entries.
//!
//! Top-level files are stored under their basename and directories under
//! `<dirname>/...`. With an ignore pattern, any file or directory whose
//! basename matches is left out, and a matching directory is pruned
//! without visiting its contents.

use crate::PpapError;
use crate::Result;
use crate::filter;
use crate::filter::IgnorePattern;
use crate::inputs::ClassifiedInputs;
use crate::naming::last_segment;
use std::collections::HashSet;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of a planned archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, stored encrypted.
    File,
    /// Directory, stored as an empty `name/` entry.
    Directory,
}

/// A filesystem entry scheduled for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Where the entry is read from.
    pub source: PathBuf,

    /// Name inside the archive, `/`-separated. Directories end with `/`.
    pub archive_name: String,

    /// File or directory.
    pub kind: EntryKind,
}

/// Ordered entries to write, plus what was left out while collecting.
#[derive(Debug, Clone, Default)]
pub struct ArchivePlan {
    /// Entries in archive order.
    pub entries: Vec<PlannedEntry>,

    /// Number of files and directories excluded by the ignore pattern or
    /// as duplicates.
    pub skipped: usize,

    /// Human-readable notes about skipped duplicates.
    pub warnings: Vec<String>,

    names: HashSet<String>,
}

impl ArchivePlan {
    /// Number of planned entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of planned files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .count()
    }

    /// Iterates over archive names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.archive_name.as_str())
    }

    /// Returns whether an entry with this archive name is planned.
    #[must_use]
    pub fn contains(&self, archive_name: &str) -> bool {
        self.names.contains(archive_name)
    }

    fn push(&mut self, source: &Path, archive_name: String, kind: EntryKind) {
        if self.names.contains(&archive_name) {
            if kind == EntryKind::File {
                self.skipped += 1;
                self.warnings.push(format!(
                    "Skipped duplicate entry {archive_name}: {}",
                    source.display()
                ));
            }
            return;
        }

        self.names.insert(archive_name.clone());
        self.entries.push(PlannedEntry {
            source: source.to_path_buf(),
            archive_name,
            kind,
        });
    }
}

/// Collects every entry to archive from the validated inputs.
///
/// Directory contents are visited in file-name order and symlinks are
/// followed.
///
/// # Examples
///
/// ```no_run
/// use ppap_core::collect::collect_entries;
/// use ppap_core::filter::IgnorePattern;
/// use ppap_core::inputs::classify_inputs;
///
/// let inputs = classify_inputs(&["project"])?;
/// let ignore = IgnorePattern::new(r"target|.*\.tmp")?;
/// let plan = collect_entries(&inputs, Some(&ignore))?;
/// for name in plan.names() {
///     println!("{name}");
/// }
/// # Ok::<(), ppap_core::PpapError>(())
/// ```
///
/// # Errors
///
/// Returns an I/O error if a directory cannot be listed or a symlink loop
/// is found.
pub fn collect_entries(
    inputs: &ClassifiedInputs,
    ignore: Option<&IgnorePattern>,
) -> Result<ArchivePlan> {
    let mut plan = ArchivePlan::default();

    for file in &inputs.files {
        let name = last_segment(file);
        if ignore.is_some_and(|pattern| pattern.matches_name(&name)) {
            tracing::debug!(path = %file.display(), "ignored file");
            plan.skipped += 1;
            continue;
        }
        plan.push(file, name, EntryKind::File);
    }

    for dir in &inputs.directories {
        let name = last_segment(dir);
        if ignore.is_some_and(|pattern| pattern.matches_name(&name)) {
            tracing::debug!(path = %dir.display(), "ignored directory");
            plan.skipped += 1;
            continue;
        }
        collect_directory(dir, &name, ignore, &mut plan)?;
    }

    Ok(plan)
}

fn collect_directory(
    root: &Path,
    root_name: &str,
    ignore: Option<&IgnorePattern>,
    plan: &mut ArchivePlan,
) -> Result<()> {
    let mut pruned = 0;
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() > 0 && filter::should_skip(entry.path(), ignore) {
                tracing::debug!(path = %entry.path().display(), "pruned by ignore pattern");
                pruned += 1;
                return false;
            }
            true
        });

    for entry in walker {
        let entry = entry.map_err(|e| PpapError::Io(e.into()))?;
        let relative = entry.path().strip_prefix(root).map_err(|_| {
            PpapError::Io(std::io::Error::other(format!(
                "{} is not under {}",
                entry.path().display(),
                root.display()
            )))
        })?;

        let name = archive_name(root_name, relative);
        if entry.file_type().is_dir() {
            plan.push(entry.path(), format!("{name}/"), EntryKind::Directory);
        } else {
            plan.push(entry.path(), name, EntryKind::File);
        }
    }

    plan.skipped += pruned;
    Ok(())
}

/// Joins the root name and a relative path with `/` separators.
fn archive_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inputs::classify_inputs;
    use std::fs;
    use tempfile::TempDir;

    fn names(plan: &ArchivePlan) -> Vec<&str> {
        plan.names().collect()
    }

    #[test]
    fn test_unfiltered_directory_walk() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();

        let inputs = classify_inputs(&[&root]).unwrap();
        let plan = collect_entries(&inputs, None).unwrap();

        assert_eq!(
            names(&plan),
            vec!["root/", "root/a.txt", "root/b.txt", "root/sub/", "root/sub/c.txt"]
        );
        assert_eq!(plan.file_count(), 3);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_files_come_before_directories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let file = temp.path().join("top.txt");
        fs::write(&file, "x").unwrap();

        let inputs = classify_inputs(&[&dir, &file]).unwrap();
        let plan = collect_entries(&inputs, None).unwrap();
        assert_eq!(names(&plan), vec!["top.txt", "dir/"]);
    }

    #[test]
    fn test_ignore_excludes_matching_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("keep.txt"), "k").unwrap();
        fs::write(root.join("drop.tmp"), "d").unwrap();
        fs::write(root.join("sub/a.txt"), "a").unwrap();

        let inputs = classify_inputs(&[&root]).unwrap();
        let ignore = IgnorePattern::new(r"drop\.tmp").unwrap();
        let plan = collect_entries(&inputs, Some(&ignore)).unwrap();

        assert!(plan.contains("root/keep.txt"));
        assert!(plan.contains("root/sub/a.txt"));
        assert!(!plan.contains("root/drop.tmp"));
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn test_ignore_prunes_matching_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("skip_dir")).unwrap();
        fs::create_dir_all(root.join("keep_dir")).unwrap();
        fs::write(root.join("skip_dir/x.txt"), "x").unwrap();
        fs::write(root.join("keep_dir/y.txt"), "y").unwrap();

        let inputs = classify_inputs(&[&root]).unwrap();
        let ignore = IgnorePattern::new("skip_dir").unwrap();
        let plan = collect_entries(&inputs, Some(&ignore)).unwrap();

        let files: Vec<&str> = plan
            .entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.archive_name.as_str())
            .collect();
        assert_eq!(files, vec!["root/keep_dir/y.txt"]);
        assert!(!plan.names().any(|name| name.contains("skip_dir")));
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn test_ignore_top_level_inputs() {
        let temp = TempDir::new().unwrap();
        let skipped_dir = temp.path().join("cache");
        fs::create_dir(&skipped_dir).unwrap();
        fs::write(skipped_dir.join("inner.txt"), "i").unwrap();
        let skipped_file = temp.path().join("notes.bak");
        fs::write(&skipped_file, "b").unwrap();
        let kept = temp.path().join("notes.txt");
        fs::write(&kept, "t").unwrap();

        let inputs = classify_inputs(&[&skipped_dir, &skipped_file, &kept]).unwrap();
        let ignore = IgnorePattern::new(r"cache|.*\.bak").unwrap();
        let plan = collect_entries(&inputs, Some(&ignore)).unwrap();

        assert_eq!(names(&plan), vec!["notes.txt"]);
        assert_eq!(plan.skipped, 2);
    }

    #[test]
    fn test_pattern_is_not_a_substring_search() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("tmp"), "1").unwrap();
        fs::write(root.join("tmp.txt"), "2").unwrap();

        let inputs = classify_inputs(&[&root]).unwrap();
        let ignore = IgnorePattern::new("tmp").unwrap();
        let plan = collect_entries(&inputs, Some(&ignore)).unwrap();

        assert!(!plan.contains("root/tmp"));
        assert!(plan.contains("root/tmp.txt"));
    }

    #[test]
    fn test_duplicate_basenames_keep_first() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        let first = temp.path().join("a/same.txt");
        let second = temp.path().join("b/same.txt");
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();

        let inputs = classify_inputs(&[&first, &second]).unwrap();
        let plan = collect_entries(&inputs, None).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries[0].source, first);
        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_empty_directory_is_kept() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let inputs = classify_inputs(&[&empty]).unwrap();
        let plan = collect_entries(&inputs, None).unwrap();
        assert_eq!(names(&plan), vec!["empty/"]);
        assert_eq!(plan.entries[0].kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_io_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(&root, root.join("again")).unwrap();

        let inputs = classify_inputs(&[&root]).unwrap();
        let result = collect_entries(&inputs, None);
        assert!(matches!(result, Err(PpapError::Io(_))));
    }

    #[test]
    fn test_archive_name_uses_forward_slashes() {
        assert_eq!(
            archive_name("root", Path::new("a").join("b").join("c.txt").as_path()),
            "root/a/b/c.txt"
        );
        assert_eq!(archive_name("root", Path::new("")), "root");
    }
}
