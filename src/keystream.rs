//! Key streams drawn from a word index, and the shift cipher that
//! consumes them.
//!
//! A word index is an `AvlDict<String, usize>` mapping the first
//! [`KEY_LEN`] characters of every word in a text to that word's
//! character offset. Walking the index in different orders yields
//! different streams of shifts.

use std::{
    fmt,
    io::{self, BufRead},
    ops::Bound,
};

use crate::compare::Compare;
use crate::dict::AvlDict;
use crate::node::NodeId;

/// Keys keep at most this many characters of a word.
pub const KEY_LEN: usize = 5;

const LETTERS: usize = 26;

const WORD_SEPARATOR: &[char] = &[',', '.', '?', ' ', '\t', '\r', '\n'];

/// Read `reader` line by line and insert every word into `dict`, keyed by
/// its first [`KEY_LEN`] characters, valued by the sum of the lengths of
/// all words before it. Return the number of words read.
pub fn load_words<R, C>(dict: &mut AvlDict<String, usize, C>, reader: R) -> io::Result<usize>
where
    R: BufRead,
    C: Compare<String>,
{
    let (mut offset, mut words) = (0, 0);
    for line in reader.lines() {
        let line = line?;
        for word in line.split(WORD_SEPARATOR).filter(|w| !w.is_empty()) {
            let key: String = word.chars().take(KEY_LEN).collect();
            dict.insert(key, offset);
            offset += word.len();
            words += 1;
        }
    }
    Ok(words)
}

/// Sequence of alphabet shifts, each in `0..26`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyStream {
    shifts: Vec<u8>,
}

impl KeyStream {
    pub fn new<I>(values: I) -> KeyStream
    where
        I: IntoIterator<Item = usize>,
    {
        let shifts = values.into_iter().map(shift).collect();
        KeyStream { shifts }
    }

    /// Shift for every pair in `dict`, in sorted order.
    pub fn inorder<K, C>(dict: &AvlDict<K, usize, C>) -> Option<KeyStream> {
        if dict.is_empty() {
            return None;
        }
        Some(KeyStream::new(dict.iter().map(|(_, v)| *v)))
    }

    /// Locate the key with most pairs, ties going to the larger key, and
    /// return shifts for every pair whose key sits on the same tree level,
    /// in sorted order.
    pub fn level<K, C>(dict: &AvlDict<K, usize, C>) -> Option<KeyStream>
    where
        C: Compare<K>,
    {
        let root = dict.root()?;

        let (mut busiest, mut most) = (root, 0);
        let mut cursor = dict.first();
        while let Some(id) = cursor {
            let (n, tail) = chain_len(dict, id)?;
            if n >= most {
                busiest = id;
                most = n;
            }
            cursor = dict.node(tail)?.next();
        }

        let level = dict.level(dict.node(busiest)?.key())?;
        let mut ids = vec![];
        collect_level(dict, root, 1, level, &mut ids);

        let mut values = vec![];
        for id in ids {
            values.extend(dict.get_all(dict.node(id)?.key()).map(|(_, v)| *v));
        }
        Some(KeyStream::new(values))
    }

    /// Shifts for every pair with `low <= key <= high`, in sorted order.
    pub fn range<K, C>(dict: &AvlDict<K, usize, C>, low: &K, high: &K) -> Option<KeyStream>
    where
        C: Compare<K>,
    {
        if dict.is_empty() {
            return None;
        }
        let bounds = (Bound::Included(low), Bound::Included(high));
        Some(KeyStream::new(dict.range::<K, _>(bounds).map(|(_, v)| *v)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    #[inline]
    pub fn shifts(&self) -> &[u8] {
        &self.shifts
    }

    /// Upper-case and shift every ASCII letter forward by the next shift
    /// in the stream, cycling as needed. Other characters pass through
    /// and do not consume a shift.
    pub fn encrypt(&self, text: &str) -> String {
        self.apply(text, true)
    }

    /// Undo [`encrypt`](KeyStream::encrypt).
    pub fn decrypt(&self, text: &str) -> String {
        self.apply(text, false)
    }

    fn apply(&self, text: &str, forward: bool) -> String {
        if self.shifts.is_empty() {
            return text.to_string();
        }
        let mut shifts = self.shifts.iter().cycle();
        text.chars()
            .map(|ch| {
                if !ch.is_ascii_alphabetic() {
                    return ch;
                }
                let s = shifts.next().copied().unwrap_or(0);
                let c = ch.to_ascii_uppercase() as u8 - b'A';
                let c = if forward {
                    (c + s) % LETTERS as u8
                } else {
                    (c + LETTERS as u8 - s) % LETTERS as u8
                };
                (b'A' + c) as char
            })
            .collect()
    }
}

impl fmt::Display for KeyStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Decryption key of length {} is:", self.shifts.len())?;
        for (i, s) in self.shifts.iter().enumerate() {
            write!(f, "{} ", s)?;
            if (i + 1) % 10 == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[inline]
fn shift(value: usize) -> u8 {
    (value % LETTERS) as u8
}

// length and tail of the duplicate chain starting at canonical node id.
fn chain_len<K, V, C>(dict: &AvlDict<K, V, C>, id: NodeId) -> Option<(usize, NodeId)> {
    let tail = dict.node(id)?.end()?;
    let (mut n, mut link) = (1, id);
    while link != tail {
        link = dict.node(link)?.next()?;
        n += 1;
    }
    Some((n, tail))
}

// left to right, which is sorted order, across one tree level.
fn collect_level<K, V, C>(
    dict: &AvlDict<K, V, C>,
    id: NodeId,
    depth: usize,
    level: usize,
    acc: &mut Vec<NodeId>,
) {
    if depth == level {
        acc.push(id);
        return;
    }
    if let Some(node) = dict.node(id) {
        for child in [node.left(), node.right()].into_iter().flatten() {
            collect_level(dict, child, depth + 1, level, acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_index(text: &str) -> AvlDict<String, usize> {
        let mut dict = AvlDict::new("words");
        load_words(&mut dict, text.as_bytes()).unwrap();
        dict
    }

    #[test]
    fn test_load_words() {
        let mut dict: AvlDict<String, usize> = AvlDict::new("words");
        let n = load_words(&mut dict, "elephants, elephantine.\r\nant?".as_bytes()).unwrap();
        assert_eq!(n, 3);
        assert_eq!(dict.len(), 3);
        let items: Vec<(String, usize)> = dict.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let refs = vec![
            ("ant".to_string(), 20),
            ("eleph".to_string(), 0),
            ("eleph".to_string(), 9),
        ];
        assert_eq!(items, refs);
        assert!(dict.validate().is_ok());
    }

    #[test]
    fn test_empty_index() {
        let dict = word_index("");
        assert_eq!(KeyStream::inorder(&dict), None);
        assert_eq!(KeyStream::level(&dict), None);
        let (a, z) = ("a".to_string(), "z".to_string());
        assert_eq!(KeyStream::range(&dict, &a, &z), None);
    }

    #[test]
    fn test_keystreams() {
        // alpha(0) beta(5) alpha(9) gamma(14), tree is beta(alpha, gamma)
        let dict = word_index("alpha beta alpha gamma\n");
        assert_eq!(dict.level("beta"), Some(1));

        let ks = KeyStream::inorder(&dict).unwrap();
        assert_eq!(ks.shifts(), &[0, 9, 5, 14]);

        let ks = KeyStream::level(&dict).unwrap();
        assert_eq!(ks.shifts(), &[0, 9, 14]);

        let (low, high) = ("b".to_string(), "h".to_string());
        let ks = KeyStream::range(&dict, &low, &high).unwrap();
        assert_eq!(ks.shifts(), &[5, 14]);
    }

    #[test]
    fn test_level_tie_goes_to_larger_key() {
        // every key seen once, gamma is the largest and sits on level 2.
        let dict = word_index("beta alpha gamma");
        let ks = KeyStream::level(&dict).unwrap();
        assert_eq!(ks.shifts(), &[(4 % 26) as u8, (9 % 26) as u8]);
    }

    #[test]
    fn test_cipher() {
        let ks = KeyStream::new(vec![1, 28]);
        assert_eq!(ks.shifts(), &[1, 2]);
        let secret = ks.encrypt("abc xyz!");
        assert_eq!(secret, "BDD ZZB!");
        assert_eq!(ks.decrypt(&secret), "ABC XYZ!");
        assert_eq!(KeyStream::default().encrypt("abc"), "abc");
    }

    #[test]
    fn test_display() {
        let ks = KeyStream::new(0..12);
        let s = ks.to_string();
        let refs = "Decryption key of length 12 is:\n0 1 2 3 4 5 6 7 8 9 \n10 11 ";
        assert_eq!(s, refs);
    }
}
