//! End-to-end wizard flow tests driven by a scripted fake screen,
//! a fixed provider, and a recording command runner.

use snapper_rollback::command::{Command, CommandRunner};
use snapper_rollback::errors::RollbackError;
use snapper_rollback::snapshots::{CleanupPolicy, Snapshot, SnapshotKind, System, SystemProvider};
use snapper_rollback::tui::{Key, ScreenIo, Wizard};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

struct FakeScreen {
    keys: VecDeque<Key>,
    drawn: Vec<String>,
}

impl FakeScreen {
    fn new(keys: &[Key]) -> FakeScreen {
        FakeScreen {
            keys: keys.iter().copied().collect(),
            drawn: Vec::new(),
        }
    }

    fn drawn_text(&self) -> String {
        self.drawn.join("\n")
    }
}

impl ScreenIo for FakeScreen {
    fn size(&self) -> (u16, u16) {
        (24, 80)
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn print(&mut self, _row: u16, _col: u16, text: &str) -> anyhow::Result<()> {
        self.drawn.push(text.to_string());
        Ok(())
    }

    fn print_emphasized(&mut self, _row: u16, _col: u16, text: &str) -> anyhow::Result<()> {
        self.drawn.push(text.to_string());
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn read_key(&mut self) -> anyhow::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("key script exhausted"))
    }
}

struct FakeProvider {
    systems: Vec<System>,
    snapshots: Vec<(String, Vec<Snapshot>)>,
    snapshot_calls: RefCell<Vec<String>>,
}

impl SystemProvider for FakeProvider {
    fn systems(&self) -> anyhow::Result<Vec<System>> {
        Ok(self.systems.clone())
    }

    fn snapshots(&self, system: &System) -> anyhow::Result<Vec<Snapshot>> {
        self.snapshot_calls.borrow_mut().push(system.name.clone());
        Ok(self
            .snapshots
            .iter()
            .find(|(name, _)| *name == system.name)
            .map(|(_, snaps)| snaps.clone())
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeRunner {
    ran: RefCell<Vec<String>>,
    detached: RefCell<Vec<String>>,
    results: RefCell<VecDeque<Result<String, RollbackError>>>,
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &Command) -> Result<String, RollbackError> {
        self.ran.borrow_mut().push(command.to_string());
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn spawn_detached(&self, command: &Command) -> Result<(), RollbackError> {
        self.detached.borrow_mut().push(command.to_string());
        Ok(())
    }
}

fn system(name: &str) -> System {
    System {
        name: name.to_string(),
        main_subvol: PathBuf::from(format!("/mnt/{name}/@")),
        snapshot_subvol: PathBuf::from(format!("/mnt/{name}/@.snapshots")),
    }
}

fn snapshot(name: &str, num: u32, date: &str) -> Snapshot {
    Snapshot {
        num,
        subvol: PathBuf::from(format!("/mnt/{name}/@.snapshots/{num}/snapshot")),
        kind: SnapshotKind::Single,
        date: date.to_string(),
        description: String::new(),
        cleanup: CleanupPolicy::None,
    }
}

/// alpha has two snapshots, beta has none.
fn alpha_beta() -> FakeProvider {
    FakeProvider {
        systems: vec![system("alpha"), system("beta")],
        snapshots: vec![
            (
                "alpha".to_string(),
                vec![
                    snapshot("alpha", 1, "2024-01-01"),
                    snapshot("alpha", 2, "2024-02-01"),
                ],
            ),
            ("beta".to_string(), Vec::new()),
        ],
        snapshot_calls: RefCell::new(Vec::new()),
    }
}

fn run_wizard(provider: &FakeProvider, runner: &FakeRunner, keys: &[Key]) -> FakeScreen {
    let mut screen = FakeScreen::new(keys);
    Wizard::new(&mut screen, provider, runner, "Snapper Rollback")
        .run()
        .expect("wizard run");
    screen
}

#[test]
fn full_rollback_runs_both_commands_in_order() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();
    runner.results.borrow_mut().extend([
        Ok("Delete subvolume '/mnt/alpha/@'".to_string()),
        Ok("Create a snapshot of '/mnt/alpha/@.snapshots/2/snapshot' in '/mnt/alpha/@'".to_string()),
    ]);

    // Select alpha; accept the default cursor (newest snapshot, #2);
    // move to Yes and confirm; then pick Exit on the final page.
    let screen = run_wizard(
        &provider,
        &runner,
        &[
            Key::Select,
            Key::Select,
            Key::Down,
            Key::Select,
            Key::Down,
            Key::Select,
        ],
    );

    assert_eq!(
        *runner.ran.borrow(),
        [
            "btrfs subvolume delete /mnt/alpha/@",
            "btrfs subvolume snapshot /mnt/alpha/@.snapshots/2/snapshot /mnt/alpha/@",
        ]
    );
    assert!(runner.detached.borrow().is_empty());

    let text = screen.drawn_text();
    assert!(text.contains("> Delete subvolume '/mnt/alpha/@'"));
    assert!(text.contains("> Create a snapshot"));
    assert!(text.contains("Rollback completed"));
}

#[test]
fn cancel_on_system_page_offers_exit_and_can_reboot() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();

    // Cancel straight away, then choose Reboot (the default item).
    let screen = run_wizard(&provider, &runner, &[Key::Cancel, Key::Select]);

    assert!(runner.ran.borrow().is_empty());
    assert_eq!(*runner.detached.borrow(), ["reboot"]);
    assert!(screen.drawn_text().contains("Exiting"));
}

#[test]
fn cancel_on_snapshot_page_returns_to_system_list() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();

    let screen = run_wizard(
        &provider,
        &runner,
        &[
            Key::Select, // into alpha's snapshots
            Key::Cancel, // back to system list
            Key::Cancel, // to the exit offer
            Key::Down,   // Exit
            Key::Select,
        ],
    );

    assert_eq!(*provider.snapshot_calls.borrow(), ["alpha"]);
    assert!(runner.ran.borrow().is_empty());
    assert!(runner.detached.borrow().is_empty());

    let system_pages = screen
        .drawn
        .iter()
        .filter(|line| line.contains("Select operating system:"))
        .count();
    assert_eq!(system_pages, 2, "system list should be re-displayed");
}

#[test]
fn confirm_defaults_to_no_and_returns_to_snapshots() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();

    run_wizard(
        &provider,
        &runner,
        &[
            Key::Select, // alpha
            Key::Select, // snapshot 2
            Key::Select, // confirm page: default is "No"
            Key::Cancel, // back to system list
            Key::Cancel, // exit offer
            Key::Down,
            Key::Select,
        ],
    );

    assert!(runner.ran.borrow().is_empty());
    // Backing out of Confirm re-enters SelectSnapshot, which re-fetches.
    assert_eq!(*provider.snapshot_calls.borrow(), ["alpha", "alpha"]);
}

#[test]
fn confirm_page_shows_the_exact_commands() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();

    let screen = run_wizard(
        &provider,
        &runner,
        &[
            Key::Select,
            Key::Select,
            Key::Cancel, // leave the confirm page again
            Key::Cancel,
            Key::Cancel,
            Key::Down,
            Key::Select,
        ],
    );

    let text = screen.drawn_text();
    assert!(text.contains("# btrfs subvolume delete /mnt/alpha/@"));
    assert!(text.contains(
        "# btrfs subvolume snapshot /mnt/alpha/@.snapshots/2/snapshot /mnt/alpha/@"
    ));
    assert!(text.contains("Are you sure?"));
}

#[test]
fn empty_snapshot_list_only_honors_cancel() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();

    let screen = run_wizard(
        &provider,
        &runner,
        &[
            Key::Down,   // beta
            Key::Select,
            Key::Select, // ignored on the placeholder
            Key::Down,   // ignored on the placeholder
            Key::Cancel, // back to system list
            Key::Cancel,
            Key::Down,
            Key::Select,
        ],
    );

    assert!(screen.drawn_text().contains("(no items)"));
    assert_eq!(*provider.snapshot_calls.borrow(), ["beta"]);
    assert!(runner.ran.borrow().is_empty());
}

#[test]
fn failed_command_halts_sequence_and_shows_diagnostic() {
    let provider = alpha_beta();
    let runner = FakeRunner::default();
    runner.results.borrow_mut().push_back(Err(
        RollbackError::CommandFailed {
            command: "btrfs subvolume delete /mnt/alpha/@".to_string(),
            stderr: "ERROR: Could not destroy subvolume".to_string(),
        },
    ));

    let screen = run_wizard(
        &provider,
        &runner,
        &[
            Key::Select,
            Key::Select,
            Key::Down,
            Key::Select, // Yes
            Key::Down,
            Key::Select, // Exit
        ],
    );

    // The second command never runs.
    assert_eq!(runner.ran.borrow().len(), 1);
    let text = screen.drawn_text();
    assert!(text.contains("Command failed: btrfs subvolume delete /mnt/alpha/@"));
    assert!(text.contains("ERROR: Could not destroy subvolume"));
    assert!(!text.contains("Rollback completed"));
}
