//! REPL (Read-Eval-Print Loop)
//!
//! Every line is one evaluation unit. Bindings persist across lines in the
//! session frame; a failed line leaves the scope stack as it was.

use crate::config::Config;
use crate::interp::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

/// Meta commands, entered with a leading `:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Stack,
    Reset,
    Unknown(String),
}

impl Command {
    /// Parse a `:`-prefixed line; anything else is source
    pub fn parse(line: &str) -> Option<Command> {
        let name = line.strip_prefix(':')?.trim();
        Some(match name {
            "quit" | "q" | "exit" => Command::Quit,
            "help" | "h" | "?" => Command::Help,
            "stack" => Command::Stack,
            "reset" => Command::Reset,
            other => Command::Unknown(other.to_string()),
        })
    }
}

/// What the session shows for one line of source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing to print (`None` result or blank line)
    Silent,
    Value(String),
    Error(String),
}

/// Evaluate one line in the session
pub fn respond(interpreter: &mut Interpreter, line: &str) -> Response {
    if line.trim().is_empty() {
        return Response::Silent;
    }
    match interpreter.eval_source(line) {
        Ok(value) if value.is_none() => Response::Silent,
        Ok(value) => Response::Value(value.to_string()),
        Err(e) => Response::Error(e.message()),
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    prompt: String,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: &Config) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let interpreter = Interpreter::with_config(&config.interpreter);
        let history_path = config.repl.history_path();

        let mut repl = Repl {
            editor,
            interpreter,
            prompt: config.repl.prompt.clone(),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL until `:quit` or end of input
    pub fn run(&mut self) -> RlResult<()> {
        println!("esolang {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    if let Some(command) = Command::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    match respond(&mut self.interpreter, line) {
                        Response::Silent => {}
                        Response::Value(text) => println!("{text}"),
                        Response::Error(message) => eprintln!("Error: {message}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Returns true when the session should end
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return true,
            Command::Help => print_help(),
            Command::Stack => println!("{}", self.interpreter.format_stack()),
            Command::Reset => {
                self.interpreter.reset();
                println!("Session cleared.");
            }
            Command::Unknown(name) => {
                println!("Unknown command: :{name}");
                println!("Type :help for help.");
            }
        }
        false
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :help, :h       Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :stack          Show user-visible scope frames");
    println!("  :reset          Drop all session bindings");
    println!();
    println!("Examples:");
    println!("  a = 3; {{ a = 5; a + 5 }}");
    println!("  if (a == 5): {{ 1 }} else 2     # 0 is true, 1 is false");
    println!("  for i in range(1, 4) {{ print(i) }}");
    println!("  f = lambda x, y: x * y; f(6, 7)");
    println!();
    println!("Built-ins: print(x), stack(), prime(n)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse(":quit"), Some(Command::Quit));
        assert_eq!(Command::parse(":q"), Some(Command::Quit));
        assert_eq!(Command::parse(":help"), Some(Command::Help));
        assert_eq!(Command::parse(":stack"), Some(Command::Stack));
        assert_eq!(Command::parse(": reset "), Some(Command::Reset));
        assert_eq!(Command::parse(":nope"), Some(Command::Unknown("nope".into())));
        assert_eq!(Command::parse("a = 1"), None);
    }

    #[test]
    fn test_respond_value() {
        let mut interp = Interpreter::new();
        assert_eq!(respond(&mut interp, "1 + 2"), Response::Value("3".into()));
        assert_eq!(respond(&mut interp, "   "), Response::Silent);
        assert_eq!(respond(&mut interp, ""), Response::Silent);
    }

    #[test]
    fn test_respond_bindings_persist() {
        let mut interp = Interpreter::new();
        assert_eq!(respond(&mut interp, "a = 3"), Response::Value("3".into()));
        assert_eq!(respond(&mut interp, "{ a = 5 }"), Response::Value("5".into()));
        assert_eq!(respond(&mut interp, "a"), Response::Value("5".into()));
    }

    #[test]
    fn test_respond_error_keeps_session() {
        let mut interp = Interpreter::new();
        respond(&mut interp, "a = 1");
        match respond(&mut interp, "b") {
            Response::Error(message) => assert!(message.contains('b'), "{message}"),
            other => panic!("Expected error, got {other:?}"),
        }
        match respond(&mut interp, "a = (") {
            Response::Error(message) => assert!(message.starts_with("Syntax error"), "{message}"),
            other => panic!("Expected syntax error, got {other:?}"),
        }
        assert_eq!(respond(&mut interp, "a"), Response::Value("1".into()));
    }

    #[test]
    fn test_respond_none_is_silent() {
        let mut interp = Interpreter::with_output(Box::new(std::io::sink()));
        assert_eq!(respond(&mut interp, "stack()"), Response::Silent);
    }

    #[test]
    fn test_respond_function_display() {
        let mut interp = Interpreter::new();
        assert_eq!(
            respond(&mut interp, "f = lambda x, y: x + y"),
            Response::Value("<lambda x, y>".into())
        );
        assert_eq!(respond(&mut interp, "f(5, 6)"), Response::Value("11".into()));
    }
}
