use crate::dialect::Dialect;
use regex::Regex;

/// Splits SQL text into alternating live-text and literal chunks.
///
/// Every string or identifier literal recognized by the dialect ends up in
/// a chunk of its own. Joining the chunks gives back the input exactly.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    literal: Regex,
}

impl Tokenizer {
    /// Compiles the literal alternation of `dialect`.
    pub fn new(dialect: Dialect) -> crate::Result<Self> {
        let alternation = dialect.literal_patterns().join("|");
        let literal = Regex::new(&format!("(?:{alternation})"))?;
        Ok(Self { literal })
    }

    /// Splits `sql` into chunks, keeping the literals as their own chunks.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlx_array_bind::{Dialect, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new(Dialect::Sqlite)?;
    /// let chunks = tokenizer.split("SELECT ':no' FROM t WHERE id = :id");
    /// assert_eq!(chunks, vec!["SELECT ", "':no'", " FROM t WHERE id = :id"]);
    /// # Ok::<(), sqlx_array_bind::Error>(())
    /// ```
    pub fn split<'s>(&self, sql: &'s str) -> Vec<&'s str> {
        let mut chunks = Vec::new();
        let mut last = 0;
        let mut pos = 0;

        while let Some(m) = self.literal.find_at(sql, pos) {
            let end = if m.as_str().starts_with('$') {
                match dollar_quote_end(sql, m.start(), m.as_str(), m.end()) {
                    Some(end) => end,
                    None => {
                        pos = m.start() + 1;
                        continue;
                    }
                }
            } else {
                m.end()
            };

            if m.start() > last {
                chunks.push(&sql[last..m.start()]);
            }
            chunks.push(&sql[m.start()..end]);
            last = end;
            pos = end;

            if last >= sql.len() {
                break;
            }
        }

        if last < sql.len() {
            chunks.push(&sql[last..]);
        }
        chunks
    }
}

/// End offset of a dollar-quoted literal whose opening `tag` spans `start..body_start`.
///
/// Returns `None` when the tag is part of an identifier (`price$usd$`) or is
/// never closed; both cases stay live text.
fn dollar_quote_end(sql: &str, start: usize, tag: &str, body_start: usize) -> Option<usize> {
    let continues_identifier = sql[..start]
        .bytes()
        .next_back()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$');
    if continues_identifier {
        return None;
    }
    sql[body_start..]
        .find(tag)
        .map(|offset| body_start + offset + tag.len())
}

/// Whether a chunk starting with `$` is a complete `$tag$ ... $tag$` literal.
pub(crate) fn is_dollar_quoted(chunk: &str) -> bool {
    let Some(tag_end) = chunk.get(1..).and_then(|rest| rest.find('$')) else {
        return false;
    };
    let tag = &chunk[..tag_end + 2];
    chunk.len() >= 2 * tag.len() && chunk.ends_with(tag)
}
