//! Child-process plumbing for the external binary.
//!
//! Two shapes of invocation are supported: [`run_streaming`] hands back the
//! child's stderr as a lazy sequence of lines, and [`run_capture`] waits for
//! the child and returns whichever stream its exit status selects.

use std::ffi::OsStr;
use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};

use crate::error::Error;

/// A finite, non-restartable sequence of text lines.
///
/// `Ok(None)` marks the end of the sequence; every later call returns it again.
pub trait LineSource {
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, Error>> + Send;
}

/// Result of [`run_capture`]: stdout on a zero exit status, stderr otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Stdout(String),
    Stderr(String),
}

/// Stderr of a running child, read one line at a time.
///
/// Once the pipe closes the child is reaped and its exit status kept; callers
/// that care about pass/fail read it from [`LineStream::exit_code`]. A read
/// error kills the child, and so does dropping the stream before the end.
pub struct LineStream {
    program: String,
    child: Child,
    reader: Option<BufReader<ChildStderr>>,
    buf: Vec<u8>,
    status: Option<ExitStatus>,
}

impl LineStream {
    /// Exit code of the child, available after the sequence has ended.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_some()
    }
}

impl LineSource for LineStream {
    async fn next_line(&mut self) -> Result<Option<String>, Error> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        self.buf.clear();
        let read = match reader.read_until(b'\n', &mut self.buf).await {
            Ok(read) => read,
            Err(e) => {
                self.reader = None;
                if let Err(kill) = self.child.kill().await {
                    debug!("failed to kill {}: {kill}", self.program);
                }
                return Err(e.into());
            }
        };
        if read == 0 {
            self.reader = None;
            let status = self.child.wait().await?;
            debug!("{} exited with {status}", self.program);
            self.status = Some(status);
            return Ok(None);
        }
        Ok(Some(decode_line(&mut self.buf)))
    }
}

fn decode_line(buf: &mut Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8_lossy(buf).into_owned()
}

fn command<I, S>(program: &str, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).kill_on_drop(true);
    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }
    command
}

fn spawn(program: &str, command: &mut Command) -> Result<Child, Error> {
    let child = command.spawn().map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;
    debug!("spawned {program} (pid {:?})", child.id());
    Ok(child)
}

/// Starts `program` and returns its stderr as a [`LineStream`].
///
/// Stdout is inherited, not consumed.
pub fn run_streaming<I, S>(program: &str, args: I) -> Result<LineStream, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = command(program, args);
    command.stdout(Stdio::inherit()).stderr(Stdio::piped());
    let mut child = spawn(program, &mut command)?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

    Ok(LineStream {
        program: program.to_string(),
        child,
        reader: Some(BufReader::new(stderr)),
        buf: Vec::new(),
        status: None,
    })
}

/// Runs `program` to completion with both output streams captured.
pub async fn run_capture<I, S>(program: &str, args: I) -> Result<Capture, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = command(program, args);
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let output = spawn(program, &mut command)?.wait_with_output().await?;
    debug!("{program} exited with {}", output.status);

    if output.status.success() {
        Ok(Capture::Stdout(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    } else {
        Ok(Capture::Stderr(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ))
    }
}
