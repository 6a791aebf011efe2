use std::ffi::OsString;
use std::io;
use std::process::Command;

/// Runs an external program to completion and reports its exit code.
///
/// Exit code 0 means success; callers treat anything else as a fatal
/// failure for that step.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<i32>;
}

/// Invokes programs via `std::process`, inheriting stdio so the tool's own
/// progress output reaches the operator.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<i32> {
        let status = Command::new(program).args(args).status()?;
        // A signal-terminated child has no exit code; report -1 so it takes
        // the failure path.
        Ok(status.code().unwrap_or(-1))
    }
}
