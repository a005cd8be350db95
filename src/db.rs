use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{AnswerView, Candidate, Level, Outcome, Question, ResultCount, Topic};

const CANDIDATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether recording an answer created a new row or rewrote the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Inserted,
    Updated,
}

/// Persistence the interview session needs. [`Database`] is the SQLite implementation.
pub trait QuestionStore {
    fn list_topics(&self) -> Result<Vec<Topic>>;
    fn list_topics_with_questions(&self) -> Result<Vec<Topic>>;
    fn questions_for_topic(&self, topic: &str) -> Result<Vec<Question>>;
    fn questions_for_topic_and_level(&self, topic: &str, level: Level) -> Result<Vec<Question>>;
    fn answer_exists(&self, candidate_id: i64, question_id: i64) -> Result<bool>;
    fn record_or_update_answer(
        &self,
        candidate_id: i64,
        question_id: i64,
        outcome: Outcome,
        comment: Option<&str>,
    ) -> Result<Recorded>;
    fn result_counts(&self, candidate_id: i64) -> Result<Vec<ResultCount>>;
    fn answers_for_candidate(&self, candidate_id: i64) -> Result<Vec<AnswerView>>;
    fn create_candidate(&self, name: &str) -> Result<i64>;
    fn create_question(
        &self,
        question: &str,
        topic_id: i64,
        level: Level,
        answer: Option<&str>,
    ) -> Result<i64>;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS topic (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS level (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS question (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT,
                topic_id INTEGER NOT NULL,
                level_id INTEGER NOT NULL,
                FOREIGN KEY (topic_id) REFERENCES topic(id) ON DELETE CASCADE,
                FOREIGN KEY (level_id) REFERENCES level(id)
            );

            CREATE TABLE IF NOT EXISTS candidate (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS answer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                result INTEGER NOT NULL,
                comment TEXT,
                question_id INTEGER NOT NULL,
                candidate_id INTEGER NOT NULL,
                FOREIGN KEY (question_id) REFERENCES question(id) ON DELETE CASCADE,
                FOREIGN KEY (candidate_id) REFERENCES candidate(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_question_topic ON question(topic_id);
            CREATE INDEX IF NOT EXISTS idx_question_level ON question(level_id);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_answer_candidate_question
                ON answer(candidate_id, question_id);
            "#,
        )?;

        for level in Level::ALL {
            self.conn.execute(
                "INSERT OR IGNORE INTO level (id, title) VALUES (?1, ?2)",
                params![level.id(), level.label()],
            )?;
        }

        Ok(())
    }

    pub fn add_topic(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO topic (topic) VALUES (?1)", params![name])?;
        let id = self.conn.last_insert_rowid();
        debug!(topic = name, id, "topic created");
        Ok(id)
    }

    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, date FROM candidate ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Candidate {
                id: row.get(0)?,
                name: row.get(1)?,
                date: row.get(2)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_candidate(&self, id: i64) -> Result<Option<Candidate>> {
        let candidate = self
            .conn
            .query_row(
                "SELECT id, name, date FROM candidate WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Candidate {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        date: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(candidate)
    }

    fn query_questions(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(sql)?;

        let rows = stmt.query_map(params, |row| {
            let level_id: i64 = row.get(3)?;
            let level = Level::from_id(level_id).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Integer,
                    format!("unknown level id {}", level_id).into(),
                )
            })?;
            Ok(Question {
                id: row.get(0)?,
                text: row.get(1)?,
                answer: row.get(2)?,
                level,
                result: Outcome::NotAnsweredYet,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn query_topics(&self, sql: &str) -> Result<Vec<Topic>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Topic {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl QuestionStore for Database {
    fn list_topics(&self) -> Result<Vec<Topic>> {
        self.query_topics("SELECT id, topic FROM topic ORDER BY id")
    }

    fn list_topics_with_questions(&self) -> Result<Vec<Topic>> {
        self.query_topics(
            r#"
            SELECT DISTINCT t.id, t.topic
            FROM topic t
            JOIN question q ON t.id = q.topic_id
            ORDER BY t.id
            "#,
        )
    }

    fn questions_for_topic(&self, topic: &str) -> Result<Vec<Question>> {
        debug!(topic, "loading questions");
        self.query_questions(
            r#"
            SELECT q.id, q.question, q.answer, q.level_id
            FROM question q
            JOIN topic t ON t.id = q.topic_id
            WHERE t.topic = ?1
            ORDER BY q.id
            "#,
            params![topic],
        )
    }

    fn questions_for_topic_and_level(&self, topic: &str, level: Level) -> Result<Vec<Question>> {
        debug!(topic, level = level.id(), "loading questions for level");
        self.query_questions(
            r#"
            SELECT q.id, q.question, q.answer, q.level_id
            FROM question q
            JOIN topic t ON t.id = q.topic_id
            WHERE t.topic = ?1 AND q.level_id = ?2
            ORDER BY q.id
            "#,
            params![topic, level.id()],
        )
    }

    fn answer_exists(&self, candidate_id: i64, question_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM answer WHERE candidate_id = ?1 AND question_id = ?2",
            params![candidate_id, question_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn record_or_update_answer(
        &self,
        candidate_id: i64,
        question_id: i64,
        outcome: Outcome,
        comment: Option<&str>,
    ) -> Result<Recorded> {
        let recorded = if self.answer_exists(candidate_id, question_id)? {
            // A re-mark without a comment keeps the earlier one
            self.conn.execute(
                r#"
                UPDATE answer
                SET result = ?1,
                    comment = COALESCE(?2, comment)
                WHERE question_id = ?3 AND candidate_id = ?4
                "#,
                params![outcome.as_i32(), comment, question_id, candidate_id],
            )?;
            Recorded::Updated
        } else {
            self.conn.execute(
                "INSERT INTO answer (result, comment, question_id, candidate_id) VALUES (?1, ?2, ?3, ?4)",
                params![outcome.as_i32(), comment, question_id, candidate_id],
            )?;
            Recorded::Inserted
        };

        debug!(candidate_id, question_id, ?outcome, ?recorded, "answer stored");
        Ok(recorded)
    }

    fn result_counts(&self, candidate_id: i64) -> Result<Vec<ResultCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT result, COUNT(result)
            FROM answer
            WHERE candidate_id = ?1
            GROUP BY result
            ORDER BY result
            "#,
        )?;

        let rows = stmt.query_map(params![candidate_id], |row| {
            Ok(ResultCount {
                outcome: outcome_at(row, 0)?,
                count: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn answers_for_candidate(&self, candidate_id: i64) -> Result<Vec<AnswerView>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.id, q.id, q.question, a.result, a.comment, t.topic, lvl.title
            FROM answer a
            JOIN question q ON a.question_id = q.id
            JOIN topic t ON t.id = q.topic_id
            JOIN level lvl ON q.level_id = lvl.id
            WHERE a.candidate_id = ?1
            ORDER BY a.id
            "#,
        )?;

        let rows = stmt.query_map(params![candidate_id], |row| {
            Ok(AnswerView {
                id: row.get(0)?,
                question_id: row.get(1)?,
                question: row.get(2)?,
                outcome: outcome_at(row, 3)?,
                comment: row.get(4)?,
                topic: row.get(5)?,
                level: row.get(6)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create_candidate(&self, name: &str) -> Result<i64> {
        let date = Local::now().format(CANDIDATE_DATE_FORMAT).to_string();
        self.conn.execute(
            "INSERT INTO candidate (name, date) VALUES (?1, ?2)",
            params![name, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_question(
        &self,
        question: &str,
        topic_id: i64,
        level: Level,
        answer: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO question (question, answer, topic_id, level_id) VALUES (?1, ?2, ?3, ?4)",
            params![question, answer, topic_id, level.id()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn outcome_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Outcome> {
    let value: i32 = row.get(idx)?;
    Outcome::from_i32(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("unknown result value {}", value).into(),
        )
    })
}
