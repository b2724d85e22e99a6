//! Application state: the shared corpus plus resolved settings.
//!
//! The corpus is loaded exactly once here and never mutated afterwards, so it
//! is shared through a plain `Arc` with no lock. Quiz sessions are not part of
//! the state; each caller owns its own.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{corpus_path_from_env, record_path_from_env};
use crate::corpus::Corpus;
use crate::error::CorpusLoadError;
use crate::seeds::builtin_corpus;

#[derive(Clone, Debug)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    /// Where finished quiz summaries are appended, if anywhere.
    pub record_path: Option<PathBuf>,
}

impl AppState {
    /// Resolve settings (explicit flag, then env) and load the corpus.
    /// Falls back to the built-in corpus when no path is configured.
    #[instrument(level = "info", skip_all)]
    pub fn load(
        corpus_path: Option<PathBuf>,
        record_path: Option<PathBuf>,
    ) -> Result<Self, CorpusLoadError> {
        let corpus = match corpus_path.or_else(corpus_path_from_env) {
            Some(path) => {
                info!(target: "oop_quiz", path = %path.display(), "Loading corpus from file");
                Corpus::from_path(&path)?
            }
            None => {
                info!(target: "oop_quiz", "No corpus path configured; using built-in corpus");
                builtin_corpus()?
            }
        };
        Ok(Self::with_corpus(corpus, record_path.or_else(record_path_from_env)))
    }

    pub fn with_corpus(corpus: Corpus, record_path: Option<PathBuf>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            record_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::tests::sample_toml;

    #[test]
    fn explicit_corpus_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, sample_toml()).unwrap();
        let state = AppState::load(Some(path), None).unwrap();
        assert_eq!(state.corpus.len(), 15);
    }

    #[test]
    fn broken_corpus_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "[[topics]]\nname = ").unwrap();
        assert!(matches!(AppState::load(Some(path), None), Err(CorpusLoadError::Parse(_))));
    }

    #[test]
    fn corpus_is_shared_not_copied() {
        let state = AppState::with_corpus(crate::corpus::tests::sample(), None);
        let other = state.clone();
        assert!(Arc::ptr_eq(&state.corpus, &other.corpus));
    }
}
