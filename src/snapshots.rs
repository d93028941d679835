//! Enumeration of installations and their snapper snapshots.
//!
//! The configured root holds one directory per installation, each with a
//! writable `@` subvolume and an `@.snapshots` container laid out the way
//! snapper leaves it: `<num>/snapshot` plus `<num>/info.xml`. Entries that
//! fail validation are skipped silently; the wizard only ever sees valid,
//! sorted lists.

use crate::config::Config;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    pub name: String,
    pub main_subvol: PathBuf,
    pub snapshot_subvol: PathBuf,
}

impl System {
    /// Accept a directory as an installation if it has both the main
    /// subvolume and the snapshot container.
    fn from_dir(dir: &Path) -> Option<System> {
        let name = dir.file_name()?.to_str()?.to_string();
        let main_subvol = dir.join("@");
        let snapshot_subvol = dir.join("@.snapshots");
        if main_subvol.is_dir() && snapshot_subvol.is_dir() {
            Some(System {
                name,
                main_subvol,
                snapshot_subvol,
            })
        } else {
            log::debug!("skipping {}: not an installation layout", dir.display());
            None
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Single,
    Pre,
    Post,
}

impl SnapshotKind {
    fn parse(s: &str) -> Option<SnapshotKind> {
        match s {
            "single" => Some(SnapshotKind::Single),
            "pre" => Some(SnapshotKind::Pre),
            "post" => Some(SnapshotKind::Post),
            _ => None,
        }
    }

    fn symbol(&self) -> char {
        match self {
            SnapshotKind::Single => '-',
            SnapshotKind::Pre => '┌',
            SnapshotKind::Post => '└',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupPolicy {
    None,
    Number,
    Timeline,
    Other,
}

impl CleanupPolicy {
    fn parse(s: &str) -> CleanupPolicy {
        match s {
            "" => CleanupPolicy::None,
            "number" => CleanupPolicy::Number,
            "timeline" => CleanupPolicy::Timeline,
            // Snapper knows more policies (e.g. empty-pre-post); they are
            // cosmetic here, so render them blank instead of dropping the
            // snapshot.
            _ => CleanupPolicy::Other,
        }
    }

    fn symbol(&self) -> char {
        match self {
            CleanupPolicy::None | CleanupPolicy::Other => ' ',
            CleanupPolicy::Number => 'n',
            CleanupPolicy::Timeline => 't',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub num: u32,
    pub subvol: PathBuf,
    pub kind: SnapshotKind,
    pub date: String,
    pub description: String,
    pub cleanup: CleanupPolicy,
}

impl Snapshot {
    fn from_dir(dir: &Path) -> Option<Snapshot> {
        let name = dir.file_name()?.to_str()?;
        let num: u32 = name.parse().ok()?;
        let subvol = dir.join("snapshot");
        let info_file = dir.join("info.xml");
        if !subvol.is_dir() || !info_file.is_file() {
            log::debug!("skipping snapshot dir {}: incomplete", dir.display());
            return None;
        }
        let info = fs::read_to_string(&info_file).ok()?;
        let kind = SnapshotKind::parse(&element_text(&info, "type")?)?;
        let date = element_text(&info, "date")?;
        let description = element_text(&info, "description").unwrap_or_default();
        let cleanup = CleanupPolicy::parse(&element_text(&info, "cleanup").unwrap_or_default());
        // The directory name is authoritative; a mismatched <num> means the
        // metadata belongs to some other snapshot.
        if element_text(&info, "num")? != name {
            log::debug!("skipping snapshot dir {}: num mismatch", dir.display());
            return None;
        }
        Some(Snapshot {
            num,
            subvol,
            kind,
            date,
            description,
            cleanup,
        })
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} {} {}  {}  {}",
            self.num,
            self.kind.symbol(),
            self.date,
            self.cleanup.symbol(),
            self.description
        )
    }
}

/// Extract the text of the first `<tag>...</tag>` element.
///
/// Snapper's info.xml is flat with one value per element, so a full XML
/// parser is not warranted; this mirrors how we parse other tool output.
fn element_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(unescape(&xml[start..end]))
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Read-only source of installations and their snapshots.
pub trait SystemProvider {
    fn systems(&self) -> anyhow::Result<Vec<System>>;
    fn snapshots(&self, system: &System) -> anyhow::Result<Vec<Snapshot>>;
}

/// Provider that scans the configured btrfs root on disk.
pub struct BtrfsRoot {
    config: Config,
}

impl BtrfsRoot {
    pub fn new(config: Config) -> BtrfsRoot {
        BtrfsRoot { config }
    }
}

impl SystemProvider for BtrfsRoot {
    fn systems(&self) -> anyhow::Result<Vec<System>> {
        let mut systems = Vec::new();
        for entry in fs::read_dir(&self.config.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.config.exclude.iter().any(|e| e == n));
            if excluded {
                continue;
            }
            if let Some(system) = System::from_dir(&path) {
                systems.push(system);
            }
        }
        systems.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!("found {} installation(s)", systems.len());
        Ok(systems)
    }

    fn snapshots(&self, system: &System) -> anyhow::Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&system.snapshot_subvol)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(snapshot) = Snapshot::from_dir(&path) {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by_key(|s| s.num);
        log::info!("{}: {} snapshot(s)", system.name, snapshots.len());
        Ok(snapshots)
    }
}
