//! Interactive interview loop.

pub mod command;
pub mod render;

use std::io::Write;

use colored::Colorize;
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::db::QuestionStore;
use crate::error::{Error, Result};
use crate::models::Level;
use crate::session::{Direction, LevelShift, NavMode, Session, Started, Step};

pub use command::{parse, Command};

/// Source of operator input lines.
pub trait LineSource {
    /// Reads one line. `None` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl+C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Repl<'a, S: QuestionStore + ?Sized, I: LineSource, W: Write> {
    store: &'a S,
    input: I,
    out: W,
    session: Session,
    ps1: String,
}

impl<'a, S: QuestionStore + ?Sized, I: LineSource, W: Write> Repl<'a, S, I, W> {
    pub fn new(store: &'a S, input: I, out: W, ps1: impl Into<String>) -> Self {
        Self {
            store,
            input,
            out,
            session: Session::new(),
            ps1: ps1.into(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit`/`finish` or end of input. Command errors are reported
    /// and the loop goes on; only output failures end it early.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "{} Type {} for commands.",
            "Interview tracker.".bold().green(),
            "help".yellow()
        )?;

        loop {
            let prompt = self.prompt();
            let Some(line) = self.input.read_line(&prompt)? else {
                break;
            };

            match self.execute(parse(&line)) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(error = ?e, "command failed");
                    writeln!(self.out, "{}", e.to_string().red())?;
                }
            }
        }

        Ok(())
    }

    pub fn prompt(&self) -> String {
        let mut prompt = self.ps1.clone();
        if let Some(topic) = self.session.selected_topic() {
            prompt.push_str(&format!(" [{}]", topic));
        }
        if let Some(name) = self.session.interviewee() {
            prompt.push_str(&format!(" ({})", name));
        }
        prompt.push_str("> ");
        prompt
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Exit => {
                writeln!(self.out, "{}", "Bye".magenta())?;
                return Ok(Flow::Exit);
            }
            Command::Topics => {
                let topics = self.store.list_topics_with_questions()?;
                render::topics(&mut self.out, &topics)?;
            }
            Command::Help => render::help(&mut self.out)?,
            Command::Use { topic } => {
                let loaded = self.session.select_topic(self.store, &topic)?;
                writeln!(
                    self.out,
                    "Topic '{}' loaded with {} questions, first available level: {}",
                    loaded.topic.bold(),
                    loaded.questions,
                    loaded.starting_level.to_string().yellow()
                )?;
            }
            Command::Clear => {
                execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            }
            Command::Pwd => match self.session.selected_topic() {
                Some(topic) => writeln!(self.out, "{}", topic.bold())?,
                None => writeln!(self.out, "No topic selected.")?,
            },
            Command::Start => self.start()?,
            Command::Print => self.print_current()?,
            Command::Next => {
                if self.session.advance()? == Step::AtEnd {
                    let message = match self.session.mode() {
                        NavMode::Flat => "No questions left ...",
                        NavMode::ByLevel => "That was the last question",
                    };
                    writeln!(self.out, "{}", message.yellow())?;
                }
                self.print_current()?;
            }
            Command::Previous => {
                if self.session.retreat()? == Step::AtStart {
                    writeln!(self.out, "{}", "Already at the first question".yellow())?;
                }
                self.print_current()?;
            }
            Command::View => {
                if self.session.selected_topic().is_none() {
                    return Err(Error::NoTopic);
                }
                let (questions, current) = self.session.visible_questions();
                render::question_list(&mut self.out, &questions, current)?;
            }
            Command::Answer(outcome) => {
                let question = self.session.record_answer(self.store, outcome)?;
                writeln!(
                    self.out,
                    "Answer to '{}' marked as {}",
                    question.text,
                    render::outcome_colored(outcome)
                )?;
            }
            Command::Finish => {
                self.finish()?;
                return Ok(Flow::Exit);
            }
            Command::ShiftLevel(direction) => {
                match self.session.shift_level_focus(direction) {
                    LevelShift::Changed(level) => {
                        writeln!(self.out, "{}", format!("Level is now: {}", level).yellow())?
                    }
                    LevelShift::Saturated(level) => {
                        let verb = match direction {
                            Direction::Up => "increased",
                            Direction::Down => "decreased",
                        };
                        writeln!(
                            self.out,
                            "{}",
                            format!("Level cannot be {}, currently at: {}", verb, level).red()
                        )?
                    }
                }
            }
            Command::ToggleLevel => {
                let message = match self.session.toggle_level_filtering() {
                    NavMode::Flat => "Ignoring level",
                    NavMode::ByLevel => "Using level",
                };
                writeln!(self.out, "{}", message.cyan())?;
            }
            Command::ShowLevel => {
                writeln!(
                    self.out,
                    "Current level: {}",
                    self.session.current_level().to_string().yellow()
                )?;
            }
            Command::Stats => {
                let breakdown = self.session.stats(self.store)?;
                render::stats(&mut self.out, &breakdown)?;
            }
            Command::SetLevel(level) => {
                let level = self.session.set_level_focus(level);
                writeln!(self.out, "{}", format!("Level is now: {}", level).yellow())?;
            }
            Command::CreateQuestion => self.create_question()?,
            Command::Comment { text } => {
                let text = match text {
                    Some(text) => text,
                    None => self.input.read_line("Comment: ")?.unwrap_or_default(),
                };
                if text.trim().is_empty() {
                    match self.session.comment() {
                        Some(pending) => writeln!(self.out, "Comment unchanged: {}", pending)?,
                        None => writeln!(self.out, "No comment given.")?,
                    }
                } else {
                    self.session.set_comment(&text);
                    writeln!(self.out, "Comment saved for the next answer.")?;
                }
            }
            Command::Count => {
                if self.session.selected_topic().is_none() {
                    return Err(Error::NoTopic);
                }
                render::level_counts(&mut self.out, &self.session.level_counts())?;
            }
            Command::Answers => {
                let candidate_id = self.session.candidate_id().ok_or(Error::NotStarted)?;
                let answers = self.store.answers_for_candidate(candidate_id)?;
                render::answers(&mut self.out, &answers)?;
            }
            Command::Nothing => {}
        }
        Ok(Flow::Continue)
    }

    fn start(&mut self) -> Result<()> {
        if self.session.has_started() {
            writeln!(self.out, "{}", "Interview has already started.".yellow())?;
            return Ok(());
        }
        if self.session.selected_topic().is_none() {
            return Err(Error::NoTopic);
        }

        let name = self
            .input
            .read_line("Interviewee name: ")?
            .unwrap_or_default();
        if let Started::New { .. } = self.session.start(self.store, &name)? {
            writeln!(
                self.out,
                "Interview started for {}",
                name.trim().bold().green()
            )?;
        }
        self.print_current()
    }

    fn print_current(&mut self) -> Result<()> {
        let question = self.session.current_question()?;
        render::question(&mut self.out, question)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // The summary is best effort; finish always ends the session.
        if self.session.has_started() {
            match self.session.stats(self.store) {
                Ok(breakdown) => render::stats(&mut self.out, &breakdown)?,
                Err(e) => {
                    warn!(error = ?e, "summary unavailable");
                    writeln!(self.out, "{}", format!("Summary unavailable: {}", e).red())?;
                }
            }
        }
        let name = self.session.interviewee().unwrap_or("anonymous");
        writeln!(
            self.out,
            "{}",
            format!("Interview for '{}' has been saved.\n\n\tBye ...", name).green()
        )?;
        Ok(())
    }

    fn create_question(&mut self) -> Result<()> {
        let topics = self.store.list_topics()?;
        if topics.is_empty() {
            return Err(Error::InvalidInput(
                "No topics available, add one with `interview topic add <name>`.".to_string(),
            ));
        }

        render::topics(&mut self.out, &topics)?;
        let topic_index = self.read_index("Topic index: ", topics.len())?;
        let topic = &topics[topic_index - 1];

        render::levels(&mut self.out)?;
        let raw = self.input.read_line("Level (1-3, ap, pa, sr): ")?.unwrap_or_default();
        let level = Level::from_str(raw.trim()).ok_or_else(|| {
            Error::InvalidInput(format!("Unknown level '{}'.", raw.trim()))
        })?;

        let text = self.input.read_line("Question: ")?.unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("Question cannot be empty.".to_string()));
        }
        let answer = self.input.read_line("Answer: ")?.unwrap_or_default();
        let answer = Some(answer.trim()).filter(|a| !a.is_empty());

        let id = self.store.create_question(text, topic.id, level, answer)?;
        writeln!(
            self.out,
            "{}",
            format!("Question {} created in '{}' at level {}", id, topic.name, level).green()
        )?;

        if self.session.selected_topic() == Some(topic.name.as_str()) {
            self.session.select_topic(self.store, &topic.name)?;
        }
        Ok(())
    }

    // Reads a 1-based index in [1, max]
    fn read_index(&mut self, prompt: &str, max: usize) -> Result<usize> {
        let raw = self.input.read_line(prompt)?.unwrap_or_default();
        match raw.trim().parse::<usize>() {
            Ok(i) if (1..=max).contains(&i) => Ok(i),
            _ => Err(Error::InvalidInput(format!(
                "Invalid index '{}', expected 1 to {}.",
                raw.trim(),
                max
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{break_answers, seed_linux, setup_db};
    use crate::db::Database;
    use crate::models::Outcome;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<String>);

    impl Scripted {
        fn new(lines: &[&str]) -> Self {
            Self(lines.iter().map(|l| l.to_string()).collect())
        }
    }

    impl LineSource for Scripted {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front())
        }
    }

    fn run_script(db: &Database, lines: &[&str]) -> (String, Session) {
        let mut out = Vec::new();
        let session = {
            let mut repl = Repl::new(db, Scripted::new(lines), &mut out, "interview");
            repl.run().unwrap();
            repl.session().clone()
        };
        (String::from_utf8(out).unwrap(), session)
    }

    #[test]
    fn full_interview_records_answers() {
        let db = setup_db();
        seed_linux(&db);

        let (out, session) = run_script(
            &db,
            &[
                "use linux",
                "start",
                "Jane Doe",
                "cmt knew it cold",
                "y",
                ">",
                "n",
                "finish",
                "y",
            ],
        );

        assert!(out.contains("Interview started for"));
        assert!(out.contains("Interview for 'Jane Doe' has been saved."));
        let candidate = session.candidate_id().unwrap();
        let answers = db.answers_for_candidate(candidate).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].outcome, Outcome::Ok);
        assert_eq!(answers[0].comment.as_deref(), Some("knew it cold"));
        assert_eq!(answers[1].outcome, Outcome::Wrong);
        assert_eq!(answers[1].comment, None);
    }

    #[test]
    fn errors_are_reported_and_loop_continues() {
        let db = setup_db();
        seed_linux(&db);

        let (out, session) = run_script(&db, &["y", "next", "use cobol", "use linux", "pwd"]);

        assert!(out.contains("Interview has not yet started"));
        assert!(out.contains("Load a topic first."));
        assert!(out.contains("Topic 'cobol' not found"));
        assert_eq!(session.selected_topic(), Some("linux"));
    }

    #[test]
    fn store_failure_does_not_end_session() {
        let db = setup_db();
        seed_linux(&db);
        break_answers(&db);

        let (out, session) = run_script(&db, &["use linux", "start", "Jane", "y", "lvl"]);

        assert!(out.contains("database error, the command was not applied"));
        assert!(!out.contains("no such table"));
        assert!(out.contains("Current level"));
        assert!(session.has_started());
    }

    #[test]
    fn finish_ends_session_when_summary_fails() {
        let db = setup_db();
        seed_linux(&db);
        break_answers(&db);

        let (out, session) = run_script(
            &db,
            &["use linux", "start", "Jane", "finish", "pwd", "sr"],
        );

        assert!(out.contains("Summary unavailable"));
        assert!(out.contains("Interview for 'Jane' has been saved."));
        assert_eq!(session.current_level(), Level::Associate);
        let farewell = out.find("has been saved").unwrap();
        assert!(!out[farewell..].contains("linux"));
    }

    #[test]
    fn empty_comment_prompt_keeps_pending_comment() {
        let db = setup_db();
        seed_linux(&db);

        let (out, session) = run_script(&db, &["use linux", "cmt needed a hint", "cmt", ""]);

        assert!(out.contains("Comment unchanged: needed a hint"));
        assert_eq!(session.comment(), Some("needed a hint"));
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let db = setup_db();
        let (out, session) = run_script(&db, &["fly away", "", "exit", "use linux"]);
        assert!(out.contains("Bye"));
        assert!(session.selected_topic().is_none());
    }

    #[test]
    fn start_twice_reports_already_started() {
        let db = setup_db();
        seed_linux(&db);
        let (out, _) = run_script(&db, &["use linux", "begin", "Jane", "start"]);
        assert!(out.contains("Interview has already started."));
        assert_eq!(db.list_candidates().unwrap().len(), 1);
    }

    #[test]
    fn level_messages() {
        let db = setup_db();
        seed_linux(&db);
        let (out, _) = run_script(
            &db,
            &["use linux", "start", "Jane", ">", ">", ">", "-", "sr", "+", "=", "="],
        );
        assert!(out.contains("That was the last question"));
        assert!(out.contains("Level cannot be decreased, currently at: Associate/Programmer"));
        assert!(out.contains("Level is now: Sr. Programmer"));
        assert!(out.contains("Level cannot be increased, currently at: Sr. Programmer"));
        assert!(out.contains("Ignoring level"));
        assert!(out.contains("Using level"));
    }

    #[test]
    fn previous_at_start_uses_backward_message() {
        let db = setup_db();
        seed_linux(&db);
        let (out, _) = run_script(&db, &["use linux", "start", "Jane", "<"]);
        assert!(out.contains("Already at the first question"));
        assert!(!out.contains("That was the last question"));
    }

    #[test]
    fn create_question_reloads_selected_topic() {
        let db = setup_db();
        seed_linux(&db);

        let (out, session) = run_script(
            &db,
            &["use linux", "cq", "1", "2", "What does fork() return?", "pid", "count"],
        );

        assert!(out.contains("created in 'linux'"));
        assert_eq!(session.questions().len(), 5);
        assert_eq!(session.level_counts()[1], (Level::Analyst, 1));
    }

    #[test]
    fn create_question_rejects_bad_index() {
        let db = setup_db();
        seed_linux(&db);
        let (out, _) = run_script(&db, &["cq", "9"]);
        assert!(out.contains("Invalid index '9'"));
        assert_eq!(db.questions_for_topic("linux").unwrap().len(), 4);
    }

    #[test]
    fn stats_and_answers_commands() {
        let db = setup_db();
        seed_linux(&db);
        let (out, _) = run_script(
            &db,
            &["use linux", "start", "Jane", "y", "next", "y", "next", "bad", "stats", "answers"],
        );
        assert!(out.contains("=== Interview Statistics ==="));
        assert!(out.contains("(66.7%)"));
        assert!(out.contains("lx3 [Wrong] [linux] [Associate/Programmer]"));
    }

    #[test]
    fn prompt_shows_topic_and_interviewee() {
        let db = setup_db();
        seed_linux(&db);
        let mut out = Vec::new();
        let mut repl = Repl::new(&db, Scripted::new(&["Jane"]), &mut out, "iv");
        assert_eq!(repl.prompt(), "iv> ");
        repl.execute(parse("use linux")).unwrap();
        repl.execute(parse("start")).unwrap();
        assert_eq!(repl.prompt(), "iv [linux] (Jane)> ");
    }
}
