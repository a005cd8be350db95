use std::io::Write;

use colored::{ColoredString, Colorize};

use crate::models::{AnswerView, Candidate, Level, Outcome, Question, ResultBreakdown, Topic};

const USAGE: &[(&str, &str)] = &[
    ("exit, quit, :q, q", "leave the program"),
    ("topics, tps, t", "list topics that have questions"),
    ("use, set <topic>", "load the questions of a topic"),
    ("pwd", "show the selected topic"),
    ("cls, clear", "clear the screen"),
    ("start, begin", "start the interview (asks for the interviewee name)"),
    ("print, p", "show the current question"),
    ("next, nxt, >", "go to the next question"),
    ("previous, prev, <", "go to the previous question"),
    ("view, v", "list the questions of the current level (or all of them)"),
    ("y, ok, yes, right", "mark the current answer as OK"),
    ("n, no, wrong, bad", "mark the current answer as wrong"),
    ("hmm, meh, ?", "mark the current answer as neutral"),
    ("cmt, comment [text]", "attach a comment to the next answer (empty keeps the pending one)"),
    ("+ / -", "increase / decrease the level"),
    ("ap, pa, sr", "jump to Associate, Analyst or Senior level"),
    ("=", "toggle between level-scoped and flat navigation"),
    ("lvl", "show the current level"),
    ("count", "number of questions per level in the topic"),
    ("stats", "outcome breakdown for the interviewee"),
    ("answers", "answers recorded so far"),
    ("cq", "create a new question"),
    ("finish, done, bye", "save and leave"),
    ("help, :h, -h", "show this help"),
];

pub fn outcome_colored(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Ok => outcome.label().green(),
        Outcome::Wrong => outcome.label().red(),
        Outcome::Neutral => outcome.label().yellow(),
        Outcome::NotAnsweredYet => outcome.label().dimmed(),
    }
}

pub fn help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", "Commands".bold())?;
    for (keys, description) in USAGE {
        writeln!(out, "  {:<22} {}", keys.cyan(), description)?;
    }
    Ok(())
}

pub fn question(out: &mut impl Write, q: &Question) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}] [{}] {}",
        q.level.label().blue(),
        outcome_colored(q.result),
        q.text.bold()
    )
}

pub fn question_list(
    out: &mut impl Write,
    questions: &[&Question],
    current: Option<usize>,
) -> std::io::Result<()> {
    if questions.is_empty() {
        return writeln!(out, "{}", "No questions to show.".yellow());
    }
    for (i, q) in questions.iter().enumerate() {
        let marker = if Some(i) == current { ">" } else { " " };
        writeln!(
            out,
            "{} {:>3}. [{}] {}",
            marker,
            i + 1,
            outcome_colored(q.result),
            q.text
        )?;
    }
    Ok(())
}

pub fn topics(out: &mut impl Write, topics: &[Topic]) -> std::io::Result<()> {
    if topics.is_empty() {
        return writeln!(out, "No topics found.");
    }
    for (i, topic) in topics.iter().enumerate() {
        writeln!(out, "{:>3}) {}", i + 1, topic.name)?;
    }
    Ok(())
}

pub fn levels(out: &mut impl Write) -> std::io::Result<()> {
    for level in Level::ALL {
        writeln!(out, "{:>3}) {}", level.id(), level.label())?;
    }
    Ok(())
}

pub fn level_counts(out: &mut impl Write, counts: &[(Level, usize)]) -> std::io::Result<()> {
    for (level, count) in counts {
        writeln!(out, "{:<22} {}", level.label(), count)?;
    }
    Ok(())
}

pub fn stats(out: &mut impl Write, breakdown: &ResultBreakdown) -> std::io::Result<()> {
    writeln!(out, "=== Interview Statistics ===")?;
    for outcome in Outcome::ALL {
        writeln!(
            out,
            "{:<18} {:>4} ({:.1}%)",
            outcome_colored(outcome),
            breakdown.count(outcome),
            breakdown.percentage(outcome)
        )?;
    }
    writeln!(out, "{:<18} {:>4}", "Total", breakdown.total())
}

pub fn answers(out: &mut impl Write, answers: &[AnswerView]) -> std::io::Result<()> {
    if answers.is_empty() {
        return writeln!(out, "No answers recorded.");
    }
    for answer in answers {
        writeln!(out, "{}", answer)?;
    }
    Ok(())
}

pub fn candidates(out: &mut impl Write, candidates: &[Candidate]) -> std::io::Result<()> {
    if candidates.is_empty() {
        return writeln!(out, "No candidates found.");
    }
    writeln!(out, "{:<5} {:<30} DATE", "ID", "NAME")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for c in candidates {
        writeln!(out, "{:<5} {:<30} {}", c.id, c.name, c.date)?;
    }
    Ok(())
}
