use crate::builder::CommandBuilder;
use crate::error::Result;

/// Status an alias run ends with: the host shell's exit status, `128 + signal`
/// for a killed shell, or 0 for a dry run.
pub type ExitCode = i32;

/// Object-safe trait for anything that can shape a command for an alias.
///
/// A transform receives a [`CommandBuilder`] already filled with the parsed
/// command line and mutates it in place. A blanket implementation exists for
/// closures and functions with the matching signature, so most aliases are
/// plain `fn`s.
pub trait Transform {
    /// Mutate `cb` into the command this alias stands for.
    fn apply(&self, cb: &mut CommandBuilder) -> Result<()>;
}

impl<F> Transform for F
where
    F: Fn(&mut CommandBuilder) -> Result<()>,
{
    fn apply(&self, cb: &mut CommandBuilder) -> Result<()> {
        self(cb)
    }
}

/// Transform of a literal alias: set the base command and nothing else.
#[derive(Debug, Clone)]
pub struct Literal {
    command: String,
}

impl Literal {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Transform for Literal {
    fn apply(&self, cb: &mut CommandBuilder) -> Result<()> {
        cb.base(self.command.as_str());
        Ok(())
    }
}
