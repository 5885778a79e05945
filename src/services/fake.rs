//! In-memory command gateway for tests.

use crate::ports::{CommandError, CommandGateway};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Exit,
    SpawnFailure,
}

/// Answers git invocations from a table keyed by the space-joined arguments.
/// Anything not in the table exits with status 128.
pub struct FakeGateway {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<String>>,
    delay: Duration,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleep this long inside every call, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on(mut self, args: &[&str], output: &str) -> Self {
        self.responses
            .insert(args.join(" "), Response::Output(output.to_string()));
        self
    }

    pub fn fail(mut self, args: &[&str]) -> Self {
        self.responses.insert(args.join(" "), Response::Exit);
        self
    }

    pub fn fail_to_spawn(mut self, args: &[&str]) -> Self {
        self.responses.insert(args.join(" "), Response::SpawnFailure);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, args: &[&str]) -> usize {
        let key = args.join(" ");
        self.calls().iter().filter(|c| **c == key).count()
    }
}

impl CommandGateway for FakeGateway {
    fn run(&self, args: &[&str]) -> Result<(), CommandError> {
        self.run_with_output(args).map(|_| ())
    }

    fn run_with_output(&self, args: &[&str]) -> Result<String, CommandError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match self.responses.get(&key) {
            Some(Response::Output(out)) => Ok(out.clone()),
            Some(Response::Exit) => Err(CommandError::exited(args, Some(1), "fatal: failed")),
            Some(Response::SpawnFailure) => Err(CommandError::spawn(
                args,
                io::Error::new(io::ErrorKind::NotFound, "git not found"),
            )),
            None => Err(CommandError::exited(args, Some(128), "unexpected command")),
        }
    }
}
