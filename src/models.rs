use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
}

// Difficulty tiers; the discriminants are the `level.id` values in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Associate = 1,
    Analyst = 2,
    Senior = 3,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Associate, Level::Analyst, Level::Senior];

    pub fn id(&self) -> i64 {
        *self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Level::Associate),
            2 => Some(Level::Analyst),
            3 => Some(Level::Senior),
            _ => None,
        }
    }

    /// Zero-based position of the tier in [`Level::ALL`].
    pub fn ordinal(&self) -> usize {
        *self as usize - 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Associate => "Associate/Programmer",
            Level::Analyst => "Programmer Analyst",
            Level::Senior => "Sr. Programmer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "associate" | "ap" | "1" => Some(Level::Associate),
            "analyst" | "pa" | "2" => Some(Level::Analyst),
            "senior" | "sr" | "3" => Some(Level::Senior),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Result of an answer. Discriminants are persisted in `answer.result` and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    NotAnsweredYet = 1,
    Ok = 2,
    Wrong = 3,
    Neutral = 4,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::NotAnsweredYet,
        Outcome::Ok,
        Outcome::Wrong,
        Outcome::Neutral,
    ];

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(Outcome::NotAnsweredYet),
            2 => Some(Outcome::Ok),
            3 => Some(Outcome::Wrong),
            4 => Some(Outcome::Neutral),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NotAnsweredYet => "Not answered yet",
            Outcome::Ok => "OK",
            Outcome::Wrong => "Wrong",
            Outcome::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub answer: Option<String>,
    pub level: Level,
    /// Last known result; the answer table is authoritative once persisted.
    pub result: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCount {
    pub outcome: Outcome,
    pub count: i64,
}

// An answer joined with its question, topic and level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerView {
    pub id: i64,
    pub question_id: i64,
    pub question: String,
    pub outcome: Outcome,
    pub comment: Option<String>,
    pub topic: String,
    pub level: String,
}

impl std::fmt::Display for AnswerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.comment {
            Some(comment) => write!(
                f,
                "{} [{}] [{}] [{}] [{}]",
                self.question, self.outcome, comment, self.topic, self.level
            ),
            None => write!(
                f,
                "{} [{}] [{}] [{}]",
                self.question, self.outcome, self.topic, self.level
            ),
        }
    }
}

/// Answer counts for one candidate, one slot per [`Outcome`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBreakdown {
    pub not_answered_yet: i64,
    pub ok: i64,
    pub wrong: i64,
    pub neutral: i64,
}

impl ResultBreakdown {
    pub fn from_counts(counts: &[ResultCount]) -> Self {
        let mut breakdown = Self::default();
        for rc in counts {
            *breakdown.slot_mut(rc.outcome) += rc.count;
        }
        breakdown
    }

    fn slot_mut(&mut self, outcome: Outcome) -> &mut i64 {
        match outcome {
            Outcome::NotAnsweredYet => &mut self.not_answered_yet,
            Outcome::Ok => &mut self.ok,
            Outcome::Wrong => &mut self.wrong,
            Outcome::Neutral => &mut self.neutral,
        }
    }

    pub fn count(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::NotAnsweredYet => self.not_answered_yet,
            Outcome::Ok => self.ok,
            Outcome::Wrong => self.wrong,
            Outcome::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> i64 {
        self.not_answered_yet + self.ok + self.wrong + self.neutral
    }

    pub fn percentage(&self, outcome: Outcome) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.count(outcome) as f64 / total as f64) * 100.0
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
