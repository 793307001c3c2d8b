//! Interactive command execution.
//!
//! The child's stdout is piped, echoed to the operator and scanned for
//! scripted questions. Two readers feed one channel:
//!
//! - the child-output reader (raw chunks, so prompts without a trailing
//!   newline are seen)
//! - the operator-input relay (lines typed by the operator)
//!
//! A single owner loop receives both and is the only writer to the child's
//! stdin, so writes happen in the order events arrive. The relay belongs to
//! a single command: it is stopped and joined once the child's output
//! closes, and on Unix it reads the operator's stdin one byte at a time only
//! when input is ready, so nothing past the child's lifetime is consumed.

use std::io::{self, BufRead, Read, Write};
use std::process::{ChildStdin, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::anyhow;

use crate::config::Interaction;
use crate::error::{KilnError, Result};

use super::command::{shell_command, CommandOptions, CommandResult};

/// How often the relay checks whether it should stop.
const RELAY_POLL: Duration = Duration::from_millis(50);

/// Events delivered to the owner loop.
#[derive(Debug)]
enum ChildEvent {
    /// A chunk of the child's stdout.
    Output(String),
    /// A line typed by the operator.
    Input(String),
    /// The child's stdout reached EOF.
    Closed,
}

/// Source of operator-typed lines for interactive commands.
#[derive(Debug, Clone)]
pub struct OperatorInput {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    /// The process's stdin, read only while a command is running.
    Stdin,
    /// Lines queued by a background reader. Clones share the queue.
    Lines(Arc<Mutex<Receiver<String>>>),
}

impl OperatorInput {
    /// The process's stdin.
    pub fn stdin() -> Self {
        Self {
            source: Source::Stdin,
        }
    }

    /// Read operator lines from an arbitrary reader.
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self {
            source: Source::Lines(spawn_line_reader(reader)),
        }
    }

    /// A source that never yields a line.
    pub fn none() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self {
            source: Source::Lines(Arc::new(Mutex::new(rx))),
        }
    }

    /// Start forwarding operator lines into `events`.
    fn relay(&self, events: Sender<ChildEvent>) -> Relay {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = match &self.source {
            #[cfg(unix)]
            Source::Stdin => spawn_stdin_relay(flag, events),
            #[cfg(not(unix))]
            Source::Stdin => spawn_queue_relay(shared_stdin_lines(), flag, events),
            Source::Lines(lines) => spawn_queue_relay(Arc::clone(lines), flag, events),
        };

        Relay { stop, handle }
    }
}

fn spawn_line_reader<R: BufRead + Send + 'static>(reader: R) -> Arc<Mutex<Receiver<String>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in reader.lines().map_while(std::result::Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    Arc::new(Mutex::new(rx))
}

/// Without readiness polling the stdin reader blocks, so it is started once
/// and shared by every command.
#[cfg(not(unix))]
fn shared_stdin_lines() -> Arc<Mutex<Receiver<String>>> {
    use std::sync::OnceLock;

    static STDIN: OnceLock<Arc<Mutex<Receiver<String>>>> = OnceLock::new();
    Arc::clone(STDIN.get_or_init(|| spawn_line_reader(io::BufReader::new(io::stdin()))))
}

fn spawn_queue_relay(
    lines: Arc<Mutex<Receiver<String>>>,
    flag: Arc<AtomicBool>,
    events: Sender<ChildEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !flag.load(Ordering::Relaxed) {
            let received = match lines.lock() {
                Ok(rx) => rx.recv_timeout(RELAY_POLL),
                Err(_) => break,
            };
            match received {
                Ok(line) => {
                    if events.send(ChildEvent::Input(line)).is_err() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

#[cfg(unix)]
fn spawn_stdin_relay(flag: Arc<AtomicBool>, events: Sender<ChildEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut line = Vec::new();
        while !flag.load(Ordering::Relaxed) {
            match stdin_ready(RELAY_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            match read_stdin_byte() {
                Ok(Some(b'\n')) => {
                    let text = String::from_utf8_lossy(&line).into_owned();
                    line.clear();
                    if events.send(ChildEvent::Input(text)).is_err() {
                        return;
                    }
                }
                Ok(Some(byte)) => line.push(byte),
                Ok(None) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        if !line.is_empty() {
            let _ = events.send(ChildEvent::Input(String::from_utf8_lossy(&line).into_owned()));
        }
    })
}

/// Wait up to `timeout` for stdin to become readable. Hang-up and error
/// conditions count as ready so the following read reports them.
#[cfg(unix)]
fn stdin_ready(timeout: Duration) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
    // SAFETY: `fds` is a single valid pollfd that outlives the call.
    let ready = unsafe { libc::poll(&mut fds, 1, millis) };
    match ready {
        -1 => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(false)
            } else {
                Err(err)
            }
        }
        0 => Ok(false),
        _ => Ok(true),
    }
}

/// Read one byte from stdin, bypassing std's buffered handle. `None` on EOF.
#[cfg(unix)]
fn read_stdin_byte() -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    // SAFETY: reads at most one byte into a live local.
    let read = unsafe { libc::read(libc::STDIN_FILENO, (&mut byte as *mut u8).cast(), 1) };
    match read {
        -1 => Err(io::Error::last_os_error()),
        0 => Ok(None),
        _ => Ok(Some(byte)),
    }
}

/// A running operator-input relay.
struct Relay {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Relay {
    fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// First interaction whose question appears in `chunk`.
pub fn match_interaction<'a>(interactions: &'a [Interaction], chunk: &str) -> Option<&'a Interaction> {
    interactions
        .iter()
        .find(|interaction| chunk.contains(&interaction.question))
}

/// Execute a shell command, answering scripted questions and relaying
/// operator input.
///
/// stderr is inherited. A non-zero exit is reported in the returned
/// [`CommandResult`], whose `stdout` holds everything the child printed.
pub fn execute_interactive(
    command: &str,
    options: &CommandOptions,
    interactions: &[Interaction],
    operator: &OperatorInput,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = shell_command(command, options);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    tracing::debug!("Running interactive command: {}", command);
    let mut child = cmd.spawn().map_err(|source| KilnError::CommandSpawn {
        command: command.to_string(),
        source,
    })?;

    let mut child_stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin of '{}' was not piped", command))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout of '{}' was not piped", command))?;

    let (tx, rx) = mpsc::channel();
    let reader = spawn_output_reader(stdout, tx.clone());
    let relay = operator.relay(tx);

    for event in rx.iter() {
        match event {
            ChildEvent::Output(chunk) => {
                if let Some(interaction) = match_interaction(interactions, &chunk) {
                    tracing::debug!("Answering scripted question '{}'", interaction.question);
                    send_line(&mut child_stdin, &interaction.answer);
                }
            }
            ChildEvent::Input(line) => send_line(&mut child_stdin, &line),
            ChildEvent::Closed => break,
        }
    }

    relay.stop();
    drop(child_stdin);

    let stdout_output = reader.join().unwrap_or_default();
    let status = child.wait().map_err(|source| KilnError::CommandSpawn {
        command: command.to_string(),
        source,
    })?;

    Ok(CommandResult::from_status(
        status,
        stdout_output,
        start.elapsed(),
    ))
}

/// Read the child's stdout in raw chunks, echoing each to our stdout.
fn spawn_output_reader<R: Read + Send + 'static>(
    mut stdout: R,
    events: Sender<ChildEvent>,
) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut captured = String::new();
        let mut buf = [0u8; 4096];
        let mut echo = io::stdout();

        loop {
            match stdout.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let _ = echo.write_all(&buf[..n]);
                    let _ = echo.flush();

                    let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                    captured.push_str(&chunk);
                    if events.send(ChildEvent::Output(chunk)).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }

        let _ = events.send(ChildEvent::Closed);
        captured
    })
}

/// Write `line` plus a newline to the child. The child may already have
/// closed its stdin, so failures are only logged.
fn send_line(stdin: &mut ChildStdin, line: &str) {
    let written = writeln!(stdin, "{}", line).and_then(|_| stdin.flush());
    if let Err(e) = written {
        tracing::debug!("Could not write to command stdin: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn interaction(question: &str, answer: &str) -> Interaction {
        Interaction {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn match_interaction_finds_first_substring_match() {
        let interactions = vec![
            interaction("Project name", "demo"),
            interaction("name", "other"),
        ];

        let found = match_interaction(&interactions, "? Project name: ").unwrap();
        assert_eq!(found.answer, "demo");

        let found = match_interaction(&interactions, "Package name: ").unwrap();
        assert_eq!(found.answer, "other");

        assert!(match_interaction(&interactions, "Continue? ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn answers_scripted_prompt_without_newline() {
        let interactions = vec![interaction("Name?", "demo")];

        let result = execute_interactive(
            "printf 'Name? '; read name; echo \"hello $name\"",
            &CommandOptions::default(),
            &interactions,
            &OperatorInput::none(),
        )
        .unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("hello demo"));
    }

    #[cfg(unix)]
    #[test]
    fn relays_operator_input() {
        let operator = OperatorInput::from_reader(Cursor::new("typed by hand\n"));

        let result = execute_interactive(
            "read answer; echo \"got $answer\"",
            &CommandOptions::default(),
            &[],
            &operator,
        )
        .unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("got typed by hand"));
    }

    #[cfg(unix)]
    #[test]
    fn answers_several_prompts_in_order() {
        let interactions = vec![interaction("First?", "one"), interaction("Second?", "two")];

        let result = execute_interactive(
            "printf 'First? '; read a; printf 'Second? '; read b; echo \"$a-$b\"",
            &CommandOptions::default(),
            &interactions,
            &OperatorInput::none(),
        )
        .unwrap();

        assert!(result.stdout.contains("one-two"));
    }

    #[cfg(unix)]
    #[test]
    fn reports_non_zero_exit() {
        let result = execute_interactive(
            "echo failing; exit 4",
            &CommandOptions::default(),
            &[],
            &OperatorInput::none(),
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(4));
        assert!(result.stdout.contains("failing"));
    }

    #[cfg(unix)]
    #[test]
    fn command_without_prompts_finishes() {
        let result = execute_interactive(
            "echo plain",
            &CommandOptions::default(),
            &[interaction("never shown", "x")],
            &OperatorInput::none(),
        )
        .unwrap();

        assert!(result.success);
    }
}
