//! Process management for the external commands bfm runs.
//!
//! Preview commands run through `sh -c` in their own process group with stdout and
//! stderr merged into one non-blocking pipe, so the event loop can poll the output
//! without a reader thread and a single `killpg` stops the whole shell pipeline.
//!
//! Interactive commands (editor, `!cmd`) run in the foreground with inherited stdio.

use std::io::{self, PipeReader, Read};
use std::os::fd::AsRawFd;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

const READ_CHUNK: usize = 8192;

/// Whether the output pipe may still produce data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeState {
    Open,
    Closed,
}

/// A shell command running as the leader of its own process group.
#[derive(Debug)]
pub struct GroupProcess {
    child: Child,
    reader: PipeReader,
    exited: bool,
}

/// Spawns `sh -c command` in `cwd` as a new process group.
///
/// Standard output and standard error share one pipe whose read end is non-blocking.
pub fn spawn_piped(command: &str, cwd: &Path) -> io::Result<GroupProcess> {
    let (reader, writer) = io::pipe()?;
    set_nonblocking(&reader)?;

    let child = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .process_group(0);
        cmd.spawn()?
        // cmd drops here and closes our copies of the write end
    };

    tracing::debug!(pid = child.id(), command, "spawned preview process");
    Ok(GroupProcess {
        child,
        reader,
        exited: false,
    })
}

/// Runs `sh -c command` in `cwd` with the terminal handed over, and waits for it.
pub fn run_interactive(command: &str, cwd: &Path) -> io::Result<ExitStatus> {
    tracing::debug!(command, cwd = %cwd.display(), "running interactive command");
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .status()
}

fn set_nonblocking(reader: &PipeReader) -> io::Result<()> {
    let fd = reader.as_raw_fd();
    // SAFETY: fd is a valid descriptor owned by reader, fcntl does not touch memory
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags == -1 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: same descriptor, only the status flags change
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl GroupProcess {
    #[inline]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Appends whatever output is ready to `out`, reading at most `budget` bytes.
    ///
    /// Never blocks. Returns [PipeState::Closed] once every writer has gone away.
    pub fn read_available(&mut self, out: &mut Vec<u8>, budget: usize) -> io::Result<PipeState> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut taken = 0;
        while taken < budget {
            let want = READ_CHUNK.min(budget - taken);
            match self.reader.read(&mut chunk[..want]) {
                Ok(0) => return Ok(PipeState::Closed),
                Ok(n) => {
                    out.extend_from_slice(&chunk[..n]);
                    taken += n;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(PipeState::Open),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(PipeState::Open)
    }

    /// Reaps the leader if it has exited. Returns true once it has.
    pub fn try_reap(&mut self) -> bool {
        if !self.exited {
            self.exited = matches!(self.child.try_wait(), Ok(Some(_)));
        }
        self.exited
    }

    /// Sends SIGTERM to the whole process group and hands back the child for reaping.
    ///
    /// Does not wait. The group is signalled even when the leader already exited, since
    /// its background children keep the group alive.
    pub fn terminate(mut self) -> Option<Child> {
        if let Err(err) = signal_group(self.child.id(), libc::SIGTERM) {
            tracing::warn!(pid = self.child.id(), %err, "failed to signal preview group");
        }
        if self.try_reap() {
            return None;
        }
        Some(self.child)
    }
}

/// Signals every process in group `pgid`. A group that is already gone is not an error.
pub fn signal_group(pgid: u32, signal: libc::c_int) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(pgid).map_err(io::Error::other)?;
    // SAFETY: killpg has no memory safety requirements
    if unsafe { libc::killpg(pgid, signal) } == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(err);
        }
    }
    Ok(())
}
