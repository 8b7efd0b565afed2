// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process inspection used by the resource sampler.

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};
use thiserror::Error;

/// Memory and CPU of one process at the last refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessUsage {
    pub pid: u32,
    pub name: String,
    /// Resident set size in bytes.
    pub memory_bytes: u64,
    /// CPU utilization over the last refresh window, 100.0 per busy core.
    pub cpu_percent: f64,
}

/// Why a process could not be inspected.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("process {0} is no longer running")]
    Vanished(u32),

    #[error("access to process {0} was denied")]
    AccessDenied(u32),

    #[error("process table unavailable: {0}")]
    Unavailable(String),
}

/// Source of per-process resource figures.
///
/// CPU figures are deltas: they describe the time between the two most
/// recent [`refresh`](ProcessProbe::refresh) calls.
pub trait ProcessProbe: Send + 'static {
    fn refresh(&mut self) -> Result<(), ProbeError>;

    /// Usage of the process that hosts the sampler.
    fn own_usage(&self) -> Result<ProcessUsage, ProbeError>;

    /// Every other live process whose name or any command-line argument
    /// contains `needle`, compared case-insensitively.
    fn matching(&self, needle: &str) -> Result<Vec<ProcessUsage>, ProbeError>;
}

/// [`ProcessProbe`] backed by the host process table through `sysinfo`.
pub struct SysinfoProbe {
    system: System,
    own_pid: Pid,
}

impl SysinfoProbe {
    pub fn new() -> Result<Self, ProbeError> {
        let own_pid =
            sysinfo::get_current_pid().map_err(|e| ProbeError::Unavailable(e.to_string()))?;
        Ok(Self {
            system: System::new(),
            own_pid,
        })
    }

    fn usage(pid: Pid, process: &sysinfo::Process) -> ProcessUsage {
        ProcessUsage {
            pid: pid.as_u32(),
            name: process.name().to_string_lossy().into_owned(),
            memory_bytes: process.memory(),
            cpu_percent: f64::from(process.cpu_usage()),
        }
    }
}

impl ProcessProbe for SysinfoProbe {
    fn refresh(&mut self) -> Result<(), ProbeError> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
        Ok(())
    }

    fn own_usage(&self) -> Result<ProcessUsage, ProbeError> {
        self.system
            .process(self.own_pid)
            .map(|p| Self::usage(self.own_pid, p))
            .ok_or(ProbeError::Vanished(self.own_pid.as_u32()))
    }

    fn matching(&self, needle: &str) -> Result<Vec<ProcessUsage>, ProbeError> {
        let mut found: Vec<ProcessUsage> = self
            .system
            .processes()
            .iter()
            .filter(|(pid, _)| **pid != self.own_pid)
            .filter(|(_, p)| p.status() != ProcessStatus::Zombie)
            .filter(|(_, p)| {
                let cmd: Vec<String> = p
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect();
                matches_process(&p.name().to_string_lossy(), &cmd, needle)
            })
            .map(|(pid, p)| Self::usage(*pid, p))
            .collect();
        found.sort_by_key(|u| u.pid);
        Ok(found)
    }
}

/// True when `needle` occurs in `name` or in any of `cmd`, ignoring case.
pub fn matches_process<S: AsRef<str>>(name: &str, cmd: &[S], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    name.to_lowercase().contains(&needle)
        || cmd
            .iter()
            .any(|arg| arg.as_ref().to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_on_name_case_insensitively() {
        assert!(matches_process::<&str>("Ollama", &[], "ollama"));
        assert!(matches_process::<&str>("ollama_llama_server", &[], "ollama"));
        assert!(!matches_process::<&str>("postgres", &[], "ollama"));
    }

    #[test]
    fn matches_on_any_command_argument() {
        let cmd = ["/usr/bin/python3", "-m", "OLLAMA.serve"];
        assert!(matches_process("python3", &cmd, "ollama"));
        assert!(!matches_process("python3", &cmd[..2], "ollama"));
    }

    #[test]
    fn empty_needle_matches_nothing() {
        assert!(!matches_process("anything", &["at", "all"], ""));
    }

    #[test]
    fn sysinfo_probe_reports_own_process() {
        let mut probe = SysinfoProbe::new().unwrap();
        probe.refresh().unwrap();
        let own = probe.own_usage().unwrap();
        assert_eq!(own.pid, std::process::id());
        assert!(own.memory_bytes > 0);
        assert!(own.cpu_percent >= 0.0);
    }

    #[test]
    fn sysinfo_probe_never_matches_itself() {
        let mut probe = SysinfoProbe::new().unwrap();
        probe.refresh().unwrap();
        let own = probe.own_usage().unwrap();
        let found = probe.matching(&own.name).unwrap();
        assert!(found.iter().all(|u| u.pid != own.pid));
    }
}
