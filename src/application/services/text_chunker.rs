use crate::domain::entities::ChunkDraft;

/// Separators from largest to smallest granularity; `""` means hard character cuts.
const SEPARATORS: [&str; 5] = [
    "\n\n", // Paragraphs
    "\n",   // Lines
    ". ",   // Sentences
    " ",    // Words
    "",     // Characters
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("Chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// Lengths are counted in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), ChunkingError> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkingError::OverlapTooLarge {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

pub trait RecursiveTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Recursive splitter with a sliding overlap window.
///
/// The text is cut into word-sized pieces, each remembering the coarsest
/// separator that ends it (paragraph, line, sentence, word). Words longer than
/// the chunk size are cut into characters. Pieces are packed into windows of
/// at most `chunk_size` characters; a window breaks after the piece with the
/// coarsest boundary, latest first, and its trailing pieces totalling at most
/// `chunk_overlap` characters open the next window.
#[derive(Debug, Clone)]
pub struct RTSplitter {
    config: ChunkingConfig,
}

#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    text: &'a str,
    len: usize,
    /// Index into `SEPARATORS` of the coarsest boundary ending this piece.
    rank: usize,
}

const CHARACTER_RANK: usize = SEPARATORS.len() - 1;

impl RTSplitter {
    pub fn new(config: ChunkingConfig) -> Result<Self, ChunkingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Chunks every page, tagging each passage with its 1-based page number
    /// and 0-based position on that page. Blank pages produce nothing.
    pub fn chunk_pages(&self, pages: &[String]) -> Vec<ChunkDraft> {
        let mut drafts = Vec::new();

        for (page_offset, page_text) in pages.iter().enumerate() {
            if page_text.trim().is_empty() {
                continue;
            }

            let page_number = (page_offset + 1) as i32;
            for (chunk_index, text) in self.split_text(page_text).into_iter().enumerate() {
                drafts.push(ChunkDraft {
                    text,
                    page_number,
                    chunk_index: chunk_index as i32,
                });
            }
        }

        drafts
    }

    fn tokenize<'a>(&self, text: &'a str, level: usize, pieces: &mut Vec<Piece<'a>>) {
        let Some(separator) = SEPARATORS.get(level).filter(|s| !s.is_empty()) else {
            let len = char_len(text);
            if len <= self.config.chunk_size {
                pieces.push(Piece {
                    text,
                    len,
                    rank: CHARACTER_RANK,
                });
            } else {
                pieces.extend(split_chars(text).map(|c| Piece {
                    text: c,
                    len: 1,
                    rank: CHARACTER_RANK,
                }));
            }
            return;
        };

        for part in text.split_inclusive(separator) {
            self.tokenize(part, level + 1, pieces);
            if part.ends_with(separator) {
                if let Some(last) = pieces.last_mut() {
                    last.rank = last.rank.min(level);
                }
            }
        }
    }

    fn pack(&self, pieces: &[Piece<'_>]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut min_break = 1;

        while start < pieces.len() {
            let mut end = start;
            let mut window_len = 0;
            while end < pieces.len() && window_len + pieces[end].len <= size {
                window_len += pieces[end].len;
                end += 1;
            }

            if end == pieces.len() {
                push_trimmed(&mut chunks, &pieces[start..end]);
                break;
            }

            // A chunk must reach past the previous one and be longer than the
            // overlap it will hand on.
            let mut best_break = None;
            let mut best_rank = usize::MAX;
            let mut run = 0;
            for candidate in (start + 1)..=end {
                run += pieces[candidate - 1].len;
                if candidate < min_break || run <= overlap {
                    continue;
                }
                if pieces[candidate - 1].rank <= best_rank {
                    best_rank = pieces[candidate - 1].rank;
                    best_break = Some(candidate);
                }
            }
            let split_at = best_break.unwrap_or(end);

            push_trimmed(&mut chunks, &pieces[start..split_at]);

            let mut next_start = split_at;
            let mut carried = 0;
            while next_start > start + 1 {
                let candidate = pieces[next_start - 1].len;
                if carried + candidate > overlap
                    || carried + candidate + pieces[split_at].len > size
                {
                    break;
                }
                carried += candidate;
                next_start -= 1;
            }

            min_break = split_at + 1;
            start = next_start;
        }

        chunks
    }
}

impl Default for RTSplitter {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

impl RecursiveTextSplitter for RTSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        self.tokenize(text, 0, &mut pieces);
        self.pack(&pieces)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_chars(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .map(move |(start, c)| &text[start..start + c.len_utf8()])
}

fn push_trimmed(chunks: &mut Vec<String>, window: &[Piece<'_>]) {
    let joined: String = window.iter().map(|piece| piece.text).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
