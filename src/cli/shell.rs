//! Interactive shell
//!
//! Reads one command per line and runs it against a long-lived `Session`,
//! so undo/redo history and background remote work survive between lines.
//! Remote results are applied between commands.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use super::session::Session;
use super::Command;
use crate::error::{PlannerError, PlannerResult};

const PROMPT: &str = "planner> ";

#[derive(Parser, Debug)]
#[command(name = "planner", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Run(Command),

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Run the read-eval loop on stdin until `exit` or end of input
pub fn run_shell(session: &mut Session) -> PlannerResult<()> {
    let stdin = io::stdin();
    run_lines(session, stdin.lock(), &mut io::stdout())
}

fn run_lines(
    session: &mut Session,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> PlannerResult<()> {
    writeln!(out, "Planner shell. Type `help` for commands, `exit` to leave.")?;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        settle_or_report(session);

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };

        match ShellLine::try_parse_from(words) {
            Ok(ShellLine {
                command: ShellCommand::Exit,
            }) => break,
            Ok(ShellLine {
                command: ShellCommand::Run(command),
            }) => {
                if let Err(e) = session.execute(command) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }

        settle_or_report(session);
    }

    session.finish()
}

/// Apply finished remote work and save; a failure is reported, not fatal
fn settle_or_report(session: &mut Session) {
    if let Err(e) = session.settle() {
        eprintln!("Error: {}", e);
    }
}

/// Split a line into words, keeping double-quoted text together
fn split_words(line: &str) -> PlannerResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(PlannerError::Validation("Unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::person::PersonCommands;
    use crate::config::{PlannerPaths, Preferences, Settings};
    use crate::models::{Document, DocumentKind};
    use crate::remote::InMemoryStorage;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_split_words_with_quotes() {
        assert_eq!(
            split_words("person add \"Alex Yeoh\" -p 87438807\n").unwrap(),
            vec!["person", "add", "Alex Yeoh", "-p", "87438807"]
        );
        assert_eq!(split_words("   \n").unwrap(), Vec::<String>::new());
        assert_eq!(split_words("tag \"\"").unwrap(), vec!["tag", ""]);
        assert!(split_words("person add \"Alex").is_err());
    }

    #[test]
    fn test_shell_line_parsing() {
        let line = ShellLine::try_parse_from(["person", "add", "Alex Yeoh"]).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::Run(Command::Person(PersonCommands::Add { ref name, .. })) if name == "Alex Yeoh"
        ));

        let exit = ShellLine::try_parse_from(["quit"]).unwrap();
        assert!(matches!(exit.command, ShellCommand::Exit));

        assert!(ShellLine::try_parse_from(["launch"]).is_err());
    }

    #[test]
    fn test_save_failure_does_not_end_the_shell() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let preferences = Preferences::new(paths.clone(), Settings::default());
        let mut session =
            Session::with_remote(preferences, Arc::new(InMemoryStorage::new("tok"))).unwrap();

        // A directory where the data file belongs makes every save fail
        let blocked = paths.data_file(DocumentKind::AddressBook);
        fs::create_dir_all(blocked.join("occupied")).unwrap();

        let input = "person add \"Alex Yeoh\"\nperson add \"Bernice Yu\"\nexit\n";
        let mut out = Vec::new();
        let result = run_lines(&mut session, input.as_bytes(), &mut out);

        assert!(result.is_err());
        assert_eq!(session.storage().address_book().entry_count(), 2);
        assert_eq!(String::from_utf8(out).unwrap().matches(PROMPT).count(), 3);
    }
}
