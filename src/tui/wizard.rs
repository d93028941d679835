//! The rollback flow as an explicit state machine.
//!
//! Each state shows one page and interprets its `PageResult` into the next
//! state. Cancel always returns to the immediately preceding decision
//! point; the only exception is the system page, whose Cancel leads to the
//! exit offer. `Execute` is the one-way gate: once entered, no further
//! confirmation or cancellation applies.

use super::{Page, PageResult, ScreenIo};
use crate::command::{Command, CommandRunner};
use crate::errors::{Result, RollbackError};
use crate::snapshots::{Snapshot, System, SystemProvider};

#[derive(Debug, Clone)]
pub enum WizardStep {
    SelectSystem,
    SelectSnapshot(System),
    Confirm(System, Snapshot),
    Execute(System, Snapshot),
    /// Terminal page; carries the text to display above Reboot/Exit.
    OfferReboot(Vec<String>),
}

/// Build the command sequence that replaces the system's main subvolume
/// with the chosen snapshot. Order matters: the delete must complete
/// before the replacement is created.
pub fn rollback_commands(system: &System, snapshot: &Snapshot) -> Vec<Command> {
    let main = system.main_subvol.display().to_string();
    let snap = snapshot.subvol.display().to_string();
    vec![
        Command::new("btrfs", ["subvolume", "delete", main.as_str()]),
        Command::new(
            "btrfs",
            ["subvolume", "snapshot", snap.as_str(), main.as_str()],
        ),
    ]
}

pub struct Wizard<'a> {
    screen: &'a mut dyn ScreenIo,
    provider: &'a dyn SystemProvider,
    runner: &'a dyn CommandRunner,
    title: &'a str,
}

impl<'a> Wizard<'a> {
    pub fn new(
        screen: &'a mut dyn ScreenIo,
        provider: &'a dyn SystemProvider,
        runner: &'a dyn CommandRunner,
        title: &'a str,
    ) -> Wizard<'a> {
        Wizard {
            screen,
            provider,
            runner,
            title,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let systems = self.provider.systems()?;
        let mut step = WizardStep::SelectSystem;
        loop {
            step = match step {
                WizardStep::SelectSystem => match self.select_system(&systems)? {
                    PageResult::Selected(i) => WizardStep::SelectSnapshot(systems[i].clone()),
                    PageResult::Cancelled => WizardStep::OfferReboot(vec!["Exiting".to_string()]),
                },
                WizardStep::SelectSnapshot(system) => {
                    let snapshots = self.provider.snapshots(&system)?;
                    match self.select_snapshot(&system, &snapshots)? {
                        PageResult::Selected(j) => {
                            WizardStep::Confirm(system, snapshots[j].clone())
                        }
                        PageResult::Cancelled => WizardStep::SelectSystem,
                    }
                }
                WizardStep::Confirm(system, snapshot) => {
                    match self.confirm(&system, &snapshot)? {
                        // Item 1 is "Yes"; everything else backs out.
                        PageResult::Selected(1) => WizardStep::Execute(system, snapshot),
                        _ => WizardStep::SelectSnapshot(system),
                    }
                }
                WizardStep::Execute(system, snapshot) => {
                    WizardStep::OfferReboot(self.execute(&system, &snapshot)?)
                }
                WizardStep::OfferReboot(text) => {
                    if let PageResult::Selected(0) = self.offer_reboot(&text)? {
                        log::info!("operator requested reboot");
                        // The process is about to exit either way; a failed
                        // launch is only worth a log line.
                        let reboot = Command::new("reboot", Vec::<String>::new());
                        if let Err(err) = self.runner.spawn_detached(&reboot) {
                            log::warn!("could not launch reboot: {err}");
                        }
                    }
                    return Ok(());
                }
            };
        }
    }

    fn select_system(&mut self, systems: &[System]) -> Result<PageResult> {
        let text = vec!["Select operating system:".to_string()];
        let items: Vec<String> = systems.iter().map(|s| s.to_string()).collect();
        Page {
            title: self.title,
            text: &text,
            items: &items,
            default_cursor: 0,
        }
        .show(self.screen)
    }

    fn select_snapshot(&mut self, system: &System, snapshots: &[Snapshot]) -> Result<PageResult> {
        let text = vec![
            format!("Operating system: {system}"),
            String::new(),
            "Select snapshot to rollback to:".to_string(),
        ];
        let items: Vec<String> = snapshots.iter().map(|s| s.to_string()).collect();
        Page {
            title: self.title,
            text: &text,
            items: &items,
            // Newest snapshot is the usual rollback target.
            default_cursor: items.len().saturating_sub(1),
        }
        .show(self.screen)
    }

    fn confirm(&mut self, system: &System, snapshot: &Snapshot) -> Result<PageResult> {
        let mut text = vec![
            format!("Operating system: {system}"),
            "Rollback to snapshot:".to_string(),
            snapshot.to_string(),
            String::new(),
        ];
        text.extend(
            rollback_commands(system, snapshot)
                .iter()
                .map(|c| format!("# {c}")),
        );
        text.push(String::new());
        text.push("Are you sure?".to_string());
        let items = vec!["No".to_string(), "Yes".to_string()];
        Page {
            title: self.title,
            text: &text,
            items: &items,
            // "No" first and highlighted, so a hasty Enter backs out.
            default_cursor: 0,
        }
        .show(self.screen)
    }

    /// Point of no return. Runs the rollback commands strictly in order;
    /// the first failure halts the sequence and its diagnostic becomes the
    /// final page text.
    fn execute(&mut self, system: &System, snapshot: &Snapshot) -> Result<Vec<String>> {
        log::info!(
            "rolling back {} to snapshot {}",
            system.name,
            snapshot.num
        );
        let mut lines = Vec::new();
        for command in rollback_commands(system, snapshot) {
            match self.runner.run(&command) {
                Ok(output) => lines.push(format!("> {output}")),
                Err(RollbackError::CommandFailed { command, stderr }) => {
                    let mut text = vec![format!("Command failed: {command}")];
                    text.extend(stderr.lines().map(str::to_string));
                    return Ok(text);
                }
                // Missing executable or launch failure is fatal.
                Err(err) => return Err(err.into()),
            }
        }
        lines.push(String::new());
        lines.push("Rollback completed".to_string());
        Ok(lines)
    }

    fn offer_reboot(&mut self, text: &[String]) -> Result<PageResult> {
        let items = vec!["Reboot".to_string(), "Exit".to_string()];
        Page {
            title: self.title,
            text,
            items: &items,
            default_cursor: 0,
        }
        .show(self.screen)
    }
}
