use crate::command::Command;

/// An SMT-LIB script: a sequence of commands.
#[derive(Debug, Clone, Default)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn with_commands(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) {
        self.commands.extend(cmds);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of `assert` commands in the script.
    pub fn assert_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Assert(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;
    use crate::term::Term;

    #[test]
    fn push_and_extend_preserve_order() {
        let mut script = Script::new();
        assert!(script.is_empty());
        script.push(Command::SetLogic("QF_LIA".to_string()));
        script.extend(vec![
            Command::DeclareConst("x".to_string(), Sort::Int),
            Command::CheckSat,
        ]);
        assert_eq!(script.len(), 3);
        assert!(matches!(&script.commands()[0], Command::SetLogic(l) if l == "QF_LIA"));
        assert!(matches!(&script.commands()[2], Command::CheckSat));
    }

    #[test]
    fn assert_count_counts_only_asserts() {
        let mut script = Script::new();
        script.push(Command::SetLogic("QF_LIA".to_string()));
        script.push(Command::Assert(Term::BoolLit(true)));
        script.push(Command::Assert(Term::var("p")));
        script.push(Command::CheckSat);
        assert_eq!(script.assert_count(), 2);
    }

    #[test]
    fn with_commands_round_trips() {
        let cmds = vec![Command::CheckSat, Command::GetModel, Command::Exit];
        let script = Script::with_commands(cmds.clone());
        assert_eq!(script.into_commands(), cmds);
    }
}
