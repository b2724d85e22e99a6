//! Output structs for `--format json` (serde ready).
//! Keep these small and stable; text rendering lives in `logic`.

use serde::Serialize;

use crate::corpus::Corpus;
use crate::domain::{QuestionId, QuestionRecord, Snippet, Topic};
use crate::session::SessionSummary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct TopicOut {
    pub name: String,
    pub ordinal: usize,
    pub questions: usize,
}

pub fn topic_out(corpus: &Corpus, t: &Topic) -> TopicOut {
    TopicOut {
        name: t.name.clone(),
        ordinal: t.ordinal,
        questions: corpus.questions_for_topic(&t.name).len(),
    }
}

/// Search hit: enough to pick a question, without the long explanation.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: QuestionId,
    pub topic: String,
    pub question: String,
    pub answer: String,
}

pub fn question_out(q: &QuestionRecord) -> QuestionOut {
    QuestionOut {
        id: q.id,
        topic: q.topic.clone(),
        question: q.question.clone(),
        answer: q.answer.clone(),
    }
}

/// Full record for `show` and `random`.
#[derive(Debug, Serialize)]
pub struct QuestionDetailOut<'a> {
    pub id: QuestionId,
    pub topic: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub explanation: &'a str,
    pub snippets: &'a [Snippet],
}

pub fn question_detail_out(q: &QuestionRecord) -> QuestionDetailOut<'_> {
    QuestionDetailOut {
        id: q.id,
        topic: &q.topic,
        question: &q.question,
        answer: &q.answer,
        explanation: &q.explanation,
        snippets: &q.snippets,
    }
}

#[derive(Debug, Serialize)]
pub struct QuizOut<'a> {
    pub session_id: String,
    pub seed: u64,
    pub summary: &'a SessionSummary,
}
