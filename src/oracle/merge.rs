//! Fans inference out over a page's chunks and unions the results

use crate::config::OracleConfig;
use crate::crawler::PageSnapshot;
use crate::oracle::chunker::chunk_html;
use crate::oracle::client::{InferenceResult, SelectorOracle};
use crate::oracle::response::{parse_selectors, SelectorSet};
use crate::ConfigError;
use futures::future::join_all;

/// A selector proposed by the oracle, tagged with the chunk it came from
///
/// The chunk index is diagnostic only; deduplication uses the selector alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorCandidate {
    pub selector: String,
    pub chunk_index: usize,
}

/// Produces the deduplicated selector set for one page
///
/// One inference call is issued per non-empty chunk, all concurrently, and
/// the merge waits for every call to finish. A chunk whose inference is
/// unavailable, or whose response yields nothing, contributes nothing. An
/// empty result when every chunk fails is a valid outcome.
///
/// # Errors
///
/// Only `ConfigError::InvalidConfiguration` for a bad chunk size / overlap.
pub async fn merge_selectors<O>(
    oracle: &O,
    snapshot: &PageSnapshot,
    config: &OracleConfig,
) -> Result<SelectorSet, ConfigError>
where
    O: SelectorOracle + ?Sized,
{
    let chunks = chunk_html(&snapshot.html, config.chunk_size, config.chunk_overlap)?;
    let chunks: Vec<_> = chunks.into_iter().filter(|c| !c.text.trim().is_empty()).collect();

    tracing::info!(
        "Analyzing {} ({} chars) in {} chunks of up to {} chars",
        snapshot.url,
        snapshot.html.chars().count(),
        chunks.len(),
        config.chunk_size
    );

    let responses = join_all(chunks.iter().map(|chunk| async move {
        (chunk.index, oracle.infer(chunk.text).await)
    }))
    .await;

    let mut candidates = Vec::new();
    let mut unavailable = 0usize;

    for (chunk_index, result) in responses {
        match result {
            InferenceResult::Completed(text) => {
                let parsed = parse_selectors(&text);
                if parsed.is_empty() {
                    tracing::debug!("Chunk {} yielded no selectors", chunk_index);
                }
                candidates.extend(parsed.into_iter().map(|selector| SelectorCandidate {
                    selector,
                    chunk_index,
                }));
            }
            InferenceResult::Unavailable(reason) => {
                unavailable += 1;
                tracing::debug!("Chunk {} skipped: {}", chunk_index, reason);
            }
        }
    }

    let selectors = union_candidates(candidates);

    if unavailable > 0 {
        tracing::warn!(
            "Oracle unavailable for {}/{} chunks of {}",
            unavailable,
            chunks.len(),
            snapshot.url
        );
    }
    tracing::info!("Merged {} unique selectors for {}", selectors.len(), snapshot.url);

    Ok(selectors)
}

/// Unions candidates into a set using exact string equality
pub fn union_candidates(candidates: impl IntoIterator<Item = SelectorCandidate>) -> SelectorSet {
    let mut selectors = SelectorSet::new();
    for candidate in candidates {
        if !selectors.insert(candidate.selector.clone()) {
            tracing::trace!(
                "Selector '{}' from chunk {} already proposed",
                candidate.selector,
                candidate.chunk_index
            );
        }
    }
    selectors
}
