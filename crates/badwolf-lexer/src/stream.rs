use tokio::sync::mpsc;

use crate::lexer::Lexer;
use crate::token::Token;

/// Tuning for the lexer-to-parser token channel (§4.1, §5). `capacity == 0`
/// requests a rendezvous handoff; `tokio::sync::mpsc` requires a buffer of
/// at least one slot, so a capacity of zero is rounded up to one and the
/// handoff stays effectively synchronous (the lexer task can run at most one
/// token ahead of the parser).
#[derive(Debug, Clone, Copy)]
pub struct LexerConfig {
    pub channel_capacity: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 10,
        }
    }
}

/// Spawns the lexer as its own task and returns the receiving half of the
/// bounded token channel the parser drains (§5: lexer and parser run
/// concurrently over a bounded channel).
pub fn spawn_lexer(source: impl Into<String>, config: LexerConfig) -> mpsc::Receiver<Token> {
    let capacity = config.channel_capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    let source = source.into();
    tokio::spawn(async move {
        log::trace!("lexer task started, channel capacity {capacity}");
        let mut lexer = Lexer::new(source);
        let mut emitted = 0usize;
        loop {
            let tok = lexer.next_token();
            let is_terminal = tok.is_eof() || tok.is_error();
            if is_terminal {
                log::debug!("lexer task finishing after {emitted} tokens, last {:?}", tok.kind);
            }
            if tx.send(tok).await.is_err() {
                // Parser dropped its receiver (e.g. it already failed);
                // stop producing rather than lex to completion for nothing.
                log::trace!("lexer task stopping early, receiver dropped");
                return;
            }
            emitted += 1;
            if is_terminal {
                return;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn streams_tokens_and_closes_on_eof() {
        let mut rx = spawn_lexer("select ?x;", LexerConfig::default());
        let mut count = 0;
        while let Some(tok) = rx.recv().await {
            count += 1;
            if tok.is_eof() {
                break;
            }
        }
        assert!(count >= 3);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn rendezvous_capacity_is_rounded_up_to_one() {
        let rx = spawn_lexer("select", LexerConfig { channel_capacity: 0 });
        drop(rx);
    }
}
