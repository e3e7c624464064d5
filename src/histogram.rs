/// Histogram calculates minimum, maximum, average and percentile over a
/// stream of small counts. [`AvlDict::validate`] uses one for leaf-node
/// depths and another for duplicate-chain lengths.
///
/// [`AvlDict::validate`]: crate::AvlDict::validate
#[derive(Clone, Debug)]
pub struct Histogram {
    label: &'static str,
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    counts: Vec<u64>,
}

impl Histogram {
    pub(crate) fn new(label: &'static str) -> Histogram {
        Histogram {
            label,
            samples: 0,
            min: 0,
            max: 0,
            total: 0,
            counts: vec![],
        }
    }

    pub(crate) fn sample(&mut self, n: usize) {
        if self.samples == 0 || n < self.min {
            self.min = n
        }
        if n > self.max {
            self.max = n
        }
        self.samples += 1;
        self.total += n;
        if self.counts.len() <= n {
            self.counts.resize(n + 1, 0);
        }
        self.counts[n] += 1;
    }

    /// What is being measured, e.g. "depth" or "chain".
    pub fn label(&self) -> &str {
        self.label
    }

    /// Return number of values sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average of sampled values, zero when nothing was
    /// sampled.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Return tuple of percentiles, each tuple provides
    /// (percentile, value). Returned percentiles from 90, 91 .. 100
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles: Vec<(u8, usize)> = vec![];
        if self.samples == 0 {
            return percentiles;
        }
        let (mut acc, mut prev_perc) = (0_u64, 90_u8);
        let iter = self.counts.iter().enumerate().filter(|(_, &c)| c > 0);
        for (value, count) in iter {
            acc += *count;
            let perc = ((acc as f64 / self.samples as f64) * 100_f64) as u8;
            if perc >= prev_perc {
                percentiles.push((perc, value));
                prev_perc = perc;
            }
        }
        percentiles
    }

    /// Pretty print statistics in human readable format, useful in logs.
    pub fn pretty_print(&self, prefix: &str) {
        println!(
            "{}{} (min, avg, max): {:?}",
            prefix,
            self.label,
            (self.min, self.mean(), self.max)
        );
        for (perc, value) in self.percentiles().into_iter() {
            println!("{}  {} percentile = {}", prefix, perc, value);
        }
    }

    /// Convert statistics to JSON format, useful for plotting.
    pub fn json(&self) -> String {
        let ps: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(p, v)| format!("\"{}\": {}", p, v))
            .collect();
        let strs = [
            format!("\"label\": \"{}\"", self.label),
            format!("\"min\": {}", self.min),
            format!("\"mean\": {}", self.mean()),
            format!("\"max\": {}", self.max),
            format!("\"percentiles\": {{ {} }}", ps.join(", ")),
        ];
        format!("{{ {} }}", strs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_empty() {
        let h = Histogram::new("depth");
        assert_eq!(h.samples(), 0);
        assert_eq!(h.mean(), 0);
        assert!(h.percentiles().is_empty());
    }

    #[test]
    fn test_histogram_sample() {
        let mut h = Histogram::new("chain");
        for n in [3, 1, 1, 2, 7] {
            h.sample(n);
        }
        assert_eq!(h.samples(), 5);
        assert_eq!(h.min(), 1);
        assert_eq!(h.max(), 7);
        assert_eq!(h.mean(), 2);
        assert_eq!(h.percentiles(), vec![(100, 7)]);
        assert!(h.json().starts_with("{ \"label\": \"chain\", \"min\": 1"));
    }
}
