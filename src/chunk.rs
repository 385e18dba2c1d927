// Overlapping word-window chunker.
//
// Long documents can't be embedded as a single vector without losing the
// local structure that makes near-duplicate passages detectable, so each
// document is split into fixed-size word windows that overlap by a fixed
// amount. The pairwise engine later takes the best match across all
// window combinations.

/// Default chunk size in words.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks, in words.
pub const DEFAULT_OVERLAP: usize = 100;

/// Split text into overlapping chunks of roughly `chunk_size` words.
///
/// A document at or below `chunk_size` words comes back as a single chunk
/// equal to the full text — no splitting, no padding. Longer documents are
/// windowed: each window starts `chunk_size - overlap` words after the
/// previous one, and the final window may run short. Empty text yields one
/// empty chunk so downstream stages always see at least one unit per
/// document.
///
/// Pure function of its inputs: identical text and parameters always
/// produce an identical chunk sequence. Callers must validate
/// `overlap < chunk_size` beforehand (the pipeline rejects bad settings
/// before any work begins).
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }

    chunks
}
