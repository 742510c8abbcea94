use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A ratio that may be undefined because its denominator was zero.
///
/// `Undefined` is distinct from zero: it is skipped by [`Metric::mean`],
/// sorts after every defined value in [`Metric::cmp_desc`], and is never
/// compared against a benchmark target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Metric {
    Defined(f64),
    #[default]
    Undefined,
}

impl Metric {
    /// `numerator / denominator`, or `Undefined` when the denominator is not positive.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Metric::Defined(numerator / denominator)
        } else {
            Metric::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Defined(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Metric::Defined(_))
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Metric::Defined(v) => Metric::Defined(f(v)),
            Metric::Undefined => Metric::Undefined,
        }
    }

    /// Mean over the defined values only. `Undefined` when nothing is defined.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Metric>,
    {
        let (sum, count) = values
            .into_iter()
            .filter_map(Metric::value)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            Metric::Undefined
        } else {
            Metric::Defined(sum / count as f64)
        }
    }

    /// Descending order with `Undefined` last.
    pub fn cmp_desc(&self, other: &Metric) -> Ordering {
        match (self, other) {
            (Metric::Defined(a), Metric::Defined(b)) => b.total_cmp(a),
            (Metric::Defined(_), Metric::Undefined) => Ordering::Less,
            (Metric::Undefined, Metric::Defined(_)) => Ordering::Greater,
            (Metric::Undefined, Metric::Undefined) => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Metric::Defined(v),
            _ => Metric::Undefined,
        }
    }
}

impl From<Metric> for Option<f64> {
    fn from(value: Metric) -> Self {
        value.value()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            },
            Metric::Undefined => write!(f, "n/a"),
        }
    }
}
