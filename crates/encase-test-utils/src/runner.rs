//! [`ScriptedRunner`]: a fake `CommandRunner` that records every invocation.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io;

use encase_provision::{CommandOutput, CommandRunner, Invocation};

#[derive(Debug)]
enum Reply {
    Output(CommandOutput),
    SpawnError(io::ErrorKind),
}

/// Replays queued replies per program and records what was run.
///
/// Programs without a queued reply exit 0 with empty stdout.
///
/// ```rust,no_run
/// use encase_test_utils::ScriptedRunner;
///
/// let runner = ScriptedRunner::new()
///     .on_stdout("pip3", "py-encase (0.0.30)\n")
///     .on_missing("gh");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: RefCell<BTreeMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, program: &str, reply: Reply) -> Self {
        self.replies
            .borrow_mut()
            .entry(program.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a successful run printing `stdout`.
    pub fn on_stdout(self, program: &str, stdout: &str) -> Self {
        self.push(
            program,
            Reply::Output(CommandOutput {
                status_code: 0,
                stdout: stdout.as_bytes().to_vec(),
            }),
        )
    }

    /// Queue a run exiting with `status_code`.
    pub fn on_exit(self, program: &str, status_code: i32) -> Self {
        self.push(
            program,
            Reply::Output(CommandOutput {
                status_code,
                stdout: Vec::new(),
            }),
        )
    }

    /// Queue a spawn failure with `kind`.
    pub fn on_spawn_error(self, program: &str, kind: io::ErrorKind) -> Self {
        self.push(program, Reply::SpawnError(kind))
    }

    /// Queue a "program not found" spawn failure.
    pub fn on_missing(self, program: &str) -> Self {
        self.on_spawn_error(program, io::ErrorKind::NotFound)
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Invocations of `program`.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| inv.program == program)
            .cloned()
            .collect()
    }

    /// Programs run so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|inv| inv.program.clone())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let reply = self
            .replies
            .borrow_mut()
            .get_mut(&invocation.program)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnError(kind)) => Err(io::Error::from(kind)),
            None => Ok(CommandOutput::default()),
        }
    }
}
