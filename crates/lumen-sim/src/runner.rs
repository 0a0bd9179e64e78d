//! External solver invocation.
//!
//! The solver runs under the platform shell with the output directory as
//! its working directory. Its stdout and stderr are each drained by a named
//! reader thread that forwards whole lines over a channel; the calling
//! thread writes them to the caller's sinks in arrival order until both
//! streams close, then waits for the process to exit.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::error::SimError;

/// One line of solver output, newline included when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamLine {
    /// A line from the solver's stdout.
    Stdout(Vec<u8>),
    /// A line from the solver's stderr.
    Stderr(Vec<u8>),
}

/// `command` wrapped in the platform shell.
pub fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.arg("/C");
        c
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new("sh");
        c.arg("-c");
        c
    };
    cmd.arg(command);
    cmd
}

fn spawn_reader<R>(
    name: &str,
    source: R,
    tx: Sender<StreamLine>,
    wrap: fn(Vec<u8>) -> StreamLine,
) -> io::Result<JoinHandle<io::Result<()>>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        let mut reader = BufReader::new(source);
        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            if tx.send(wrap(line)).is_err() {
                return Ok(());
            }
        }
    })
}

fn join_reader(handle: JoinHandle<io::Result<()>>) {
    let name = handle.thread().name().unwrap_or("reader").to_string();
    match handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(thread = %name, error = %e, "solver output reader failed"),
        Err(_) => warn!(thread = %name, "solver output reader panicked"),
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(error = %e, "failed to kill solver process");
    }
    let _ = child.wait();
}

/// Run `command` in `workdir`, relaying its output to `stdout` and `stderr`.
///
/// The exit status is returned uninterpreted. A failing sink does not stop
/// the relay: the remaining output is drained so the solver never blocks
/// on a full pipe, and the first sink error is returned after it exits.
pub fn run_solver(
    command: &str,
    workdir: &Path,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitStatus, SimError> {
    info!(command, workdir = %workdir.display(), "starting solver");
    let mut child = shell_command(command)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SimError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut readers = Vec::with_capacity(2);
    let pipes = (child.stdout.take(), child.stderr.take());
    if let Some(out) = pipes.0 {
        match spawn_reader("lumen-solver-stdout", out, tx.clone(), StreamLine::Stdout) {
            Ok(h) => readers.push(h),
            Err(e) => {
                kill(&mut child);
                return Err(e.into());
            }
        }
    }
    if let Some(err) = pipes.1 {
        match spawn_reader("lumen-solver-stderr", err, tx.clone(), StreamLine::Stderr) {
            Ok(h) => readers.push(h),
            Err(e) => {
                kill(&mut child);
                drop(rx);
                readers.into_iter().for_each(join_reader);
                return Err(e.into());
            }
        }
    }
    drop(tx);

    let mut sink_error: Option<io::Error> = None;
    let mut lines = 0u64;
    for line in rx.iter() {
        lines += 1;
        if sink_error.is_some() {
            continue;
        }
        let result = match &line {
            StreamLine::Stdout(bytes) => stdout.write_all(bytes).and_then(|()| stdout.flush()),
            StreamLine::Stderr(bytes) => stderr.write_all(bytes).and_then(|()| stderr.flush()),
        };
        if let Err(e) = result {
            warn!(error = %e, "output sink failed, draining solver output");
            sink_error = Some(e);
        }
    }
    readers.into_iter().for_each(join_reader);

    let status = child.wait()?;
    debug!(lines, "solver output relayed");
    info!(command, %status, "solver exited");
    match sink_error {
        Some(e) => Err(e.into()),
        None => Ok(status),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn streams_are_relayed_separately() {
        let dir = tempfile::tempdir().unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = run_solver(
            "echo one; echo two >&2; printf three",
            dir.path(),
            &mut out,
            &mut err,
        )
        .unwrap();
        assert!(status.success());
        assert_eq!(out, b"one\nthree");
        assert_eq!(err, b"two\n");
    }

    #[test]
    fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let mut out = Vec::new();
        run_solver("cat marker.txt", dir.path(), &mut out, &mut io::sink()).unwrap();
        assert_eq!(out, b"here");
    }

    #[test]
    fn exit_status_returned_uninterpreted() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_solver("exit 3", dir.path(), &mut io::sink(), &mut io::sink()).unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn failing_sink_still_drains_and_waits() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_solver(
            "i=0; while [ $i -lt 2000 ]; do echo line $i; i=$((i+1)); done; touch done.txt",
            dir.path(),
            &mut FailingSink,
            &mut io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
        assert!(dir.path().join("done.txt").exists());
    }

    #[test]
    fn missing_workdir_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_solver(
            "true",
            &dir.path().join("absent"),
            &mut io::sink(),
            &mut io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Spawn { .. }));
    }
}
