//! Parsing of one operator line into a [`Command`].

use crate::models::{Level, Outcome};
use crate::session::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Topics,
    Help,
    Use { topic: String },
    Clear,
    Pwd,
    Start,
    Print,
    Next,
    Previous,
    View,
    Answer(Outcome),
    Finish,
    ShiftLevel(Direction),
    ToggleLevel,
    ShowLevel,
    Stats,
    SetLevel(Level),
    CreateQuestion,
    Comment { text: Option<String> },
    Count,
    Answers,
    /// Anything unrecognised; ignored by the loop.
    Nothing,
}

/// First whitespace token selects the command, the rest is its argument.
pub fn parse(input: &str) -> Command {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };
    let argument = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };

    match head.to_lowercase().as_str() {
        "exit" | "quit" | ":q" | "q" => Command::Exit,
        "topics" | "tps" | "t" => Command::Topics,
        "help" | ":h" | "-h" => Command::Help,
        "use" | "set" => Command::Use {
            topic: argument.unwrap_or_default(),
        },
        "cls" | "clear" => Command::Clear,
        "pwd" => Command::Pwd,
        "start" | "begin" => Command::Start,
        "print" | "p" => Command::Print,
        "next" | "nxt" | ">" => Command::Next,
        "previous" | "prev" | "<" => Command::Previous,
        "view" | "v" => Command::View,
        "y" | "ok" | "yes" | "right" => Command::Answer(Outcome::Ok),
        "n" | "no" | "wrong" | "bad" => Command::Answer(Outcome::Wrong),
        "hmm" | "meh" | "?" => Command::Answer(Outcome::Neutral),
        "finish" | "done" | "bye" => Command::Finish,
        "+" => Command::ShiftLevel(Direction::Up),
        "-" => Command::ShiftLevel(Direction::Down),
        "=" => Command::ToggleLevel,
        "lvl" => Command::ShowLevel,
        "stats" => Command::Stats,
        "ap" => Command::SetLevel(Level::Associate),
        "pa" => Command::SetLevel(Level::Analyst),
        "sr" => Command::SetLevel(Level::Senior),
        "cq" => Command::CreateQuestion,
        "cmt" | "comment" => Command::Comment { text: argument },
        "count" => Command::Count,
        "answers" => Command::Answers,
        _ => Command::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(inputs: &[&str], expected: Command) {
        for input in inputs {
            assert_eq!(parse(input), expected, "input '{}'", input);
        }
    }

    #[test]
    fn exit_aliases() {
        all(&["exit", "quit", ":q", "q", "  EXIT  "], Command::Exit);
    }

    #[test]
    fn navigation_aliases() {
        all(&["next", "nxt", ">"], Command::Next);
        all(&["previous", "prev", "<"], Command::Previous);
        all(&["print", "p"], Command::Print);
        all(&["view", "v"], Command::View);
    }

    #[test]
    fn answer_aliases() {
        all(&["y", "ok", "yes", "right"], Command::Answer(Outcome::Ok));
        all(&["n", "no", "wrong", "bad"], Command::Answer(Outcome::Wrong));
        all(&["hmm", "meh", "?"], Command::Answer(Outcome::Neutral));
    }

    #[test]
    fn level_commands() {
        assert_eq!(parse("+"), Command::ShiftLevel(Direction::Up));
        assert_eq!(parse("-"), Command::ShiftLevel(Direction::Down));
        assert_eq!(parse("="), Command::ToggleLevel);
        assert_eq!(parse("lvl"), Command::ShowLevel);
        assert_eq!(parse("ap"), Command::SetLevel(Level::Associate));
        assert_eq!(parse("pa"), Command::SetLevel(Level::Analyst));
        assert_eq!(parse("sr"), Command::SetLevel(Level::Senior));
    }

    #[test]
    fn use_takes_rest_of_line() {
        assert_eq!(
            parse("use linux"),
            Command::Use {
                topic: "linux".to_string()
            }
        );
        assert_eq!(
            parse("set   data structures "),
            Command::Use {
                topic: "data structures".to_string()
            }
        );
        assert_eq!(
            parse("use"),
            Command::Use {
                topic: String::new()
            }
        );
    }

    #[test]
    fn comment_inline_or_prompted() {
        assert_eq!(
            parse("cmt struggled with pointers"),
            Command::Comment {
                text: Some("struggled with pointers".to_string())
            }
        );
        assert_eq!(parse("comment"), Command::Comment { text: None });
    }

    #[test]
    fn misc_commands() {
        all(&["topics", "tps", "t"], Command::Topics);
        all(&["help", ":h", "-h"], Command::Help);
        all(&["cls", "clear"], Command::Clear);
        all(&["start", "begin"], Command::Start);
        all(&["finish", "done", "bye"], Command::Finish);
        assert_eq!(parse("pwd"), Command::Pwd);
        assert_eq!(parse("stats"), Command::Stats);
        assert_eq!(parse("cq"), Command::CreateQuestion);
        assert_eq!(parse("count"), Command::Count);
        assert_eq!(parse("answers"), Command::Answers);
    }

    #[test]
    fn unknown_input_is_nothing() {
        all(&["", "   ", "fly", "nexts", "++"], Command::Nothing);
    }
}
