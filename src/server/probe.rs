//! Liveness checks and termination signals.

use crate::error::{Error, Result};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

/// Capability to inspect and terminate processes by identifier.
///
/// The lifecycle manager only talks to the OS through this trait, so tests
/// can substitute a fake.
pub trait ProcessProbe: Send + Sync {
    /// Returns `true` if a process with this identifier exists.
    fn is_alive(&self, pid: u32) -> bool;

    /// Sends a graceful (`forceful == false`) or forceful termination
    /// signal. A process that no longer exists is not an error.
    fn terminate(&self, pid: u32, forceful: bool) -> Result<()>;
}

/// [`ProcessProbe`] backed by Unix signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl ProcessProbe for OsProbe {
    fn is_alive(&self, pid: u32) -> bool {
        let Some(os_pid) = to_os_pid(pid) else {
            return false;
        };

        // An exited child of this process stays a zombie until reaped, and a
        // zombie still answers the null signal.
        if let Ok(WaitStatus::Exited(..) | WaitStatus::Signaled(..)) =
            waitpid(os_pid, Some(WaitPidFlag::WNOHANG))
        {
            return false;
        }

        match kill(os_pid, None::<Signal>) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    fn terminate(&self, pid: u32, forceful: bool) -> Result<()> {
        let os_pid =
            to_os_pid(pid).ok_or_else(|| Error::Signal(format!("Invalid process id {}", pid)))?;
        let signal = if forceful {
            Signal::SIGKILL
        } else {
            Signal::SIGTERM
        };

        match kill(os_pid, signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(Error::Signal(format!(
                "Failed to send {:?} to {}: {}",
                signal, pid, e
            ))),
        }
    }
}

fn to_os_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .map(Pid::from_raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_is_alive() {
        assert!(OsProbe.is_alive(std::process::id()));
    }

    #[test]
    fn test_out_of_range_pids_are_dead() {
        assert!(!OsProbe.is_alive(0));
        assert!(!OsProbe.is_alive(u32::MAX));
        assert!(OsProbe.terminate(0, false).is_err());
    }

    #[test]
    fn test_reaped_child_is_dead() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        assert!(!OsProbe.is_alive(pid));
    }

    #[test]
    fn test_terminate_running_child() {
        let child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();
        assert!(OsProbe.is_alive(pid));

        OsProbe.terminate(pid, false).unwrap();

        let mut alive = true;
        for _ in 0..50 {
            if !OsProbe.is_alive(pid) {
                alive = false;
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(!alive, "child should exit after SIGTERM");
    }
}
