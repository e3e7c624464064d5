// Reference multimap, keys are small non-negative integers that index
// straight into a vector of value stacks.
struct RefPairs {
    entries: Vec<Vec<i64>>,
}

impl RefPairs {
    fn new(capacity: usize) -> RefPairs {
        RefPairs {
            entries: vec![vec![]; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().map(|vals| vals.len()).sum()
    }

    fn insert(&mut self, key: i64, value: i64) {
        self.entries[key as usize].push(value)
    }

    // newest pair goes first.
    fn delete(&mut self, key: i64) -> Option<i64> {
        self.entries[key as usize].pop()
    }

    // oldest pair for key.
    fn get(&self, key: i64) -> Option<i64> {
        self.entries[key as usize].first().cloned()
    }

    fn count(&self, key: i64) -> usize {
        self.entries[key as usize].len()
    }

    fn iter(&self) -> std::vec::IntoIter<(i64, i64)> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    fn range(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<(i64, i64)> {
        let (low, high) = self.span(low, high);
        self.entries[low..high]
            .iter()
            .enumerate()
            .flat_map(|(off, vals)| {
                let key = (low + off) as i64;
                vals.iter().map(move |val| (key, *val))
            })
            .collect::<Vec<(i64, i64)>>()
            .into_iter()
    }

    fn reverse(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<(i64, i64)> {
        let mut items: Vec<(i64, i64)> = self.range(low, high).collect();
        items.reverse();
        items.into_iter()
    }

    fn span(&self, low: Bound<i64>, high: Bound<i64>) -> (usize, usize) {
        let low = match low {
            Bound::Included(low) => low as usize,
            Bound::Excluded(low) => (low + 1) as usize,
            Bound::Unbounded => 0,
        };
        let high = match high {
            Bound::Included(high) => (high + 1) as usize,
            Bound::Excluded(high) => high as usize,
            Bound::Unbounded => self.entries.len(),
        };
        let ok = low < self.entries.len();
        let ok = ok && (high >= low && high <= self.entries.len());
        if ok {
            (low, high)
        } else {
            (0, 0)
        }
    }
}

fn random_low_high(size: usize) -> (Bound<i64>, Bound<i64>) {
    let size = size as u64;
    let low = (random::<u64>() % size) as i64;
    let high = (random::<u64>() % size) as i64;
    let low = match random::<u8>() % 3 {
        0 => Bound::Included(low),
        1 => Bound::Excluded(low),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    let high = match random::<u8>() % 3 {
        0 => Bound::Included(high),
        1 => Bound::Excluded(high),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    (low, high)
}
