//! Command execution.
//!
//! Everything that changes system state goes through [`Shell`] so the
//! update and install flows can be exercised without touching the host.

use std::ffi::OsString;
use std::io;
use std::path::Path;

use duct::cmd;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str().to_os_string())
    }

    /// Prefix this command with another program, e.g. `sudo`.
    pub fn wrapped_in(self, program: &str) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(OsString::from(self.program));
        args.extend(self.args);
        Self {
            program: program.to_string(),
            args,
        }
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub trait Shell {
    /// Run to completion with inherited stdio. Non-zero exit is an error.
    fn run(&self, command: &CommandLine) -> io::Result<()>;

    /// Whether `program` resolves on PATH.
    fn has_program(&self, program: &str) -> bool;
}

/// Runs real processes.
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, command: &CommandLine) -> io::Result<()> {
        cmd(&command.program, &command.args).run().map(|_| ())
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    type Hook = Box<dyn Fn(&CommandLine) -> io::Result<()>>;

    /// Records every command instead of running it.
    #[derive(Default)]
    pub struct FakeShell {
        pub programs: HashSet<String>,
        pub log: RefCell<Vec<String>>,
        hook: Option<Hook>,
    }

    impl FakeShell {
        pub fn with_programs(programs: &[&str]) -> Self {
            Self {
                programs: programs.iter().map(|p| p.to_string()).collect(),
                ..Self::default()
            }
        }

        /// Decide the outcome (and side effects) of each command.
        pub fn on_run(mut self, hook: impl Fn(&CommandLine) -> io::Result<()> + 'static) -> Self {
            self.hook = Some(Box::new(hook));
            self
        }

        pub fn commands(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl Shell for FakeShell {
        fn run(&self, command: &CommandLine) -> io::Result<()> {
            self.log.borrow_mut().push(command.to_string());
            match &self.hook {
                Some(hook) => hook(command),
                None => Ok(()),
            }
        }

        fn has_program(&self, program: &str) -> bool {
            self.programs.contains(program)
        }
    }
}
