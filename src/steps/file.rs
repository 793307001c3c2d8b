//! File steps: create, edit, delete and move.

use regex::{Captures, Regex};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{KilnError, Result};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::resolved::{FileAction, FindReplace};

/// Prompt key used when `create` finds an existing file.
pub const FILE_CONFLICT_PROMPT: &str = "file_conflict";

/// Placeholder in `edit` content replaced by the file's current content.
pub const FILE_CONTENT_PLACEHOLDER: &str = "{{file-content}}";

static IMPORT_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@import\s+([^;\s]+);").unwrap());

/// What to do when `create` targets an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Overwrite,
    Skip,
    Backup,
}

impl FromStr for ConflictChoice {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "backup" => Ok(Self::Backup),
            other => Err(KilnError::ConfigValidationError {
                message: format!(
                    "'{}' is not a file conflict choice (overwrite, skip, backup)",
                    other
                ),
            }),
        }
    }
}

/// Run a file action.
pub fn run_file_action(action: &FileAction, ui: &mut dyn UserInterface) -> Result<()> {
    match action {
        FileAction::Create { path, content } => create_file(path, content, ui),
        FileAction::Edit {
            path,
            content,
            find_replace,
        } => edit_file(path, content, find_replace.as_ref(), ui),
        FileAction::Delete { path } => delete_file(path, ui),
        FileAction::Move { from, to } => move_file(from, to),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| KilnError::filesystem(parent, e))
        }
        _ => Ok(()),
    }
}

/// Write `content` to `path`, asking the operator first if it exists.
pub fn create_file(path: &Path, content: &str, ui: &mut dyn UserInterface) -> Result<()> {
    ensure_parent(path)?;

    if path.exists() {
        match ask_conflict(path, ui)? {
            ConflictChoice::Skip => {
                ui.note(&format!("Kept existing {}", path.display()));
                return Ok(());
            }
            ConflictChoice::Backup => {
                let backup = backup_path(path, chrono::Utc::now().timestamp_millis());
                fs::copy(path, &backup).map_err(|e| KilnError::filesystem(path, e))?;
                ui.note(&format!("Backed up {} to {}", path.display(), backup.display()));
            }
            ConflictChoice::Overwrite => {}
        }
    }

    fs::write(path, content).map_err(|e| KilnError::filesystem(path, e))?;
    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn ask_conflict(path: &Path, ui: &mut dyn UserInterface) -> Result<ConflictChoice> {
    let option = |label: &str, value: &str| PromptOption {
        label: label.to_string(),
        value: value.to_string(),
    };
    let prompt = Prompt {
        key: FILE_CONFLICT_PROMPT.to_string(),
        question: format!("{} already exists. What should happen?", path.display()),
        prompt_type: PromptType::Select {
            options: vec![
                option("Overwrite", "overwrite"),
                option("Skip", "skip"),
                option("Backup and overwrite", "backup"),
            ],
        },
        default: Some("backup".to_string()),
        validation: None,
    };

    ui.prompt(&prompt)?.as_string().parse()
}

/// `<path>.backup.<timestamp>`
pub fn backup_path(path: &Path, timestamp_ms: i64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".backup.{}", timestamp_ms));
    PathBuf::from(name)
}

/// Rewrite a file from `content`.
///
/// The first `{{file-content}}` in `content` is replaced by the current
/// content, then `@import X;` statements become `import X from 'X';`. When
/// `find_replace` is given, the output is instead the current content with
/// every `find` match replaced.
pub fn edit_file(
    path: &Path,
    content: &str,
    find_replace: Option<&FindReplace>,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ensure_parent(path)?;

    let existing = match fs::read_to_string(path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            ui.note(&format!("{} does not exist, starting from empty", path.display()));
            String::new()
        }
        Err(e) => return Err(KilnError::filesystem(path, e)),
    };

    let updated = match find_replace {
        Some(fr) => apply_find_replace(&existing, fr)?,
        None => apply_edit_template(&existing, content),
    };

    fs::write(path, updated).map_err(|e| KilnError::filesystem(path, e))
}

/// Substitute the existing content and rewrite `@import` statements.
pub fn apply_edit_template(existing: &str, content: &str) -> String {
    let merged = content.replacen(FILE_CONTENT_PLACEHOLDER, existing, 1);
    IMPORT_STATEMENT
        .replace_all(&merged, "import ${1} from '${1}';")
        .into_owned()
}

/// Replace every match of `find` in `existing`.
///
/// `replace` understands `$$`, `$&`, `` $` ``, `$'`, `$n`/`$nn` for groups
/// the pattern has and `$<name>` when the pattern names its groups. Any
/// other `$` is copied as is, so `$HOME` stays `$HOME`.
pub fn apply_find_replace(existing: &str, fr: &FindReplace) -> Result<String> {
    let pattern = Regex::new(&fr.find).map_err(|source| KilnError::InvalidPattern {
        pattern: fr.find.clone(),
        source,
    })?;
    let named = pattern.capture_names().flatten().next().is_some();

    Ok(pattern
        .replace_all(existing, |caps: &Captures<'_>| {
            let mut out = String::new();
            expand_replacement(caps, &fr.replace, existing, named, &mut out);
            out
        })
        .into_owned())
}

fn expand_replacement(
    caps: &Captures<'_>,
    replacement: &str,
    haystack: &str,
    named: bool,
    out: &mut String,
) {
    let mut rest = replacement;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match expand_reference(caps, after, haystack, named, out) {
            Some(consumed) => rest = &after[consumed..],
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
}

/// Expand the reference at the start of `after`, returning how many bytes
/// it used. `None` leaves the `$` literal.
fn expand_reference(
    caps: &Captures<'_>,
    after: &str,
    haystack: &str,
    named: bool,
    out: &mut String,
) -> Option<usize> {
    let whole = caps.get(0)?;
    let bytes = after.as_bytes();
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let groups = caps.len() - 1;

    match *bytes.first()? {
        b'$' => out.push('$'),
        b'&' => out.push_str(whole.as_str()),
        b'`' => out.push_str(&haystack[..whole.start()]),
        b'\'' => out.push_str(&haystack[whole.end()..]),
        first @ b'0'..=b'9' => {
            let one = usize::from(first - b'0');
            if let Some(&second @ b'0'..=b'9') = bytes.get(1) {
                let two = one * 10 + usize::from(second - b'0');
                if (1..=groups).contains(&two) {
                    out.push_str(group(two));
                    return Some(2);
                }
            }
            if !(1..=groups).contains(&one) {
                return None;
            }
            out.push_str(group(one));
        }
        b'<' if named => {
            let close = after.find('>')?;
            out.push_str(caps.name(&after[1..close]).map_or("", |m| m.as_str()));
            return Some(close + 1);
        }
        _ => return None,
    }
    Some(1)
}

/// Remove a file. A missing file is reported, not an error.
pub fn delete_file(path: &Path, ui: &mut dyn UserInterface) -> Result<()> {
    ensure_parent(path)?;

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            ui.note(&format!("{} does not exist, nothing to delete", path.display()));
            Ok(())
        }
        Err(e) => Err(KilnError::filesystem(path, e)),
    }
}

/// Rename `from` to `to`, creating the destination's parent.
///
/// A missing source fails before anything is created.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(KilnError::MoveSourceMissing {
            path: from.to_path_buf(),
        });
    }
    ensure_parent(to)?;
    fs::rename(from, to).map_err(|e| KilnError::filesystem(from, e))
}
