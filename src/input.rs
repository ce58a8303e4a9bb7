use std::io::{self, Read};

use aho_corasick::{AhoCorasick, BuildError};
use lib_2048::Direction;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Recognised key sequences. The arrow keys come first, in `Direction::ALL`
/// order.
const KEYS: [&[u8]; 5] = [b"\x1b[A", b"\x1b[B", b"\x1b[C", b"\x1b[D", b"q"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Quit,
}

/// Turns raw terminal bytes into keys, keeping escape sequences that are
/// split across reads.
pub struct KeyDecoder {
    searcher: AhoCorasick,
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Result<Self, BuildError> {
        Ok(Self {
            searcher: AhoCorasick::new(KEYS)?,
            pending: Vec::new(),
        })
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Key> {
        self.pending.extend_from_slice(bytes);

        let keys = self
            .searcher
            .find_iter(&self.pending)
            .map(|m| match Direction::ALL.get(m.pattern().as_usize()) {
                Some(&direction) => Key::Move(direction),
                None => Key::Quit,
            })
            .collect();

        let keep = match self.pending.as_slice() {
            [.., 0x1b, b'['] => 2,
            [.., 0x1b] => 1,
            _ => 0,
        };

        self.pending.drain(..self.pending.len() - keep);

        keys
    }
}

/// Reads keys until end of input, `q`, or the turn loop going away.
///
/// Directions are offered without waiting: while the turn loop is busy the
/// channel may be full and the key is dropped.
pub fn forward_keys(
    mut input: impl Read,
    mut decoder: KeyDecoder,
    tx: &mpsc::Sender<Direction>,
) -> io::Result<()> {
    let mut buf = [0u8; 128];

    loop {
        let len = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(len) => len,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        for key in decoder.feed(&buf[..len]) {
            let direction = match key {
                Key::Move(direction) => direction,
                Key::Quit => return Ok(()),
            };

            match tx.try_send(direction) {
                Ok(()) => {}
                Err(TrySendError::Full(direction)) => trace!(%direction, "input dropped"),
                Err(TrySendError::Closed(_)) => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn arrows_map_to_directions() {
        let mut decoder = KeyDecoder::new().unwrap();

        assert_eq!(
            decoder.feed(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            [Direction::Up, Direction::Down, Direction::Right, Direction::Left].map(Key::Move)
        );
    }

    #[test]
    fn other_bytes_are_ignored() {
        let mut decoder = KeyDecoder::new().unwrap();

        assert!(decoder.feed(b"x\n\x1b[Z").is_empty());
        assert_eq!(decoder.feed(b"aq"), [Key::Quit]);
    }

    #[test]
    fn split_escape_sequences_are_joined() {
        let mut decoder = KeyDecoder::new().unwrap();

        assert!(decoder.feed(b"\x1b").is_empty());
        assert!(decoder.feed(b"[").is_empty());
        assert_eq!(decoder.feed(b"D"), [Key::Move(Direction::Left)]);
        assert!(decoder.feed(b"\x1b[").is_empty());
        assert_eq!(decoder.feed(b"A"), [Key::Move(Direction::Up)]);
    }

    #[test]
    fn forwarding_stops_at_quit() {
        let (tx, mut rx) = mpsc::channel(8);
        let input = Cursor::new(b"\x1b[A?\x1b[Dq\x1b[B".to_vec());

        forward_keys(input, KeyDecoder::new().unwrap(), &tx).unwrap();

        assert_eq!(rx.try_recv(), Ok(Direction::Up));
        assert_eq!(rx.try_recv(), Ok(Direction::Left));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn forwarding_drops_keys_when_the_loop_is_busy() {
        let (tx, mut rx) = mpsc::channel(1);
        let input = Cursor::new(b"\x1b[A\x1b[B\x1b[C".to_vec());

        forward_keys(input, KeyDecoder::new().unwrap(), &tx).unwrap();

        assert_eq!(rx.try_recv(), Ok(Direction::Up));
        assert!(rx.try_recv().is_err());
    }
}
