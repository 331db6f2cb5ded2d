//! Version constraints of the form `1.0.0 <= v < 2.0.0`.
//!
//! Both bounds carry their own comparison operator, so all four
//! inclusive/exclusive combinations can be expressed. A bare version is
//! accepted too and means "exactly this version".

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::core::version::Version;

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(<=|<)\s+v\s+(<=|<)\s+(\S+)\s*$").expect("valid constraint regex")
});

/// Error produced while parsing versions or constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("malformed version `{0}`")]
    MalformedVersion(String),

    #[error("malformed version constraint `{0}`")]
    Malformed(String),

    #[error("version constraint `{0}` has a lower bound above its upper bound")]
    Inverted(String),
}

/// Comparison operator used by one side of a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    LessThan,
    LessThanOrEqual,
}

impl Op {
    fn eval(self, left: &Version, right: &Version) -> bool {
        match self {
            Op::LessThan => left < right,
            Op::LessThanOrEqual => left <= right,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Op::LessThan => "<",
            Op::LessThanOrEqual => "<=",
        }
    }
}

impl FromStr for Op {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Op::LessThan),
            "<=" => Ok(Op::LessThanOrEqual),
            _ => Err(()),
        }
    }
}

/// A range of versions: `low <low_op> v <high_op> high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub low: Version,
    pub low_op: Op,
    pub high_op: Op,
    pub high: Version,
}

impl Constraint {
    /// A constraint matching exactly one version.
    pub fn exact(version: Version) -> Self {
        Constraint {
            low: version,
            low_op: Op::LessThanOrEqual,
            high_op: Op::LessThanOrEqual,
            high: version,
        }
    }

    /// The usual `low <= v < high` constraint.
    pub fn range(low: Version, high: Version) -> Self {
        Constraint {
            low,
            low_op: Op::LessThanOrEqual,
            high_op: Op::LessThan,
            high,
        }
    }

    /// Parse either a bare version or a two-sided range.
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let malformed = || ConstraintError::Malformed(text.to_string());

        let Some(caps) = RANGE_RE.captures(text) else {
            // Not a range; the only other accepted form is a bare version.
            return Version::parse(text)
                .map(Constraint::exact)
                .map_err(|_| malformed());
        };

        let low = Version::parse(&caps[1]).map_err(|_| malformed())?;
        let low_op = caps[2].parse::<Op>().map_err(|_| malformed())?;
        let high_op = caps[3].parse::<Op>().map_err(|_| malformed())?;
        let high = Version::parse(&caps[4]).map_err(|_| malformed())?;

        if low > high {
            return Err(ConstraintError::Inverted(text.to_string()));
        }

        Ok(Constraint {
            low,
            low_op,
            high_op,
            high,
        })
    }

    /// Check whether `version` lies inside this range.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.low_op.eval(&self.low, version) && self.high_op.eval(version, &self.high)
    }

    /// Whether this constraint pins a single version.
    pub fn is_exact(&self) -> bool {
        self.low == self.high
            && self.low_op == Op::LessThanOrEqual
            && self.high_op == Op::LessThanOrEqual
    }

    /// The lowest version this range admits, if it admits any.
    pub fn min_version(&self) -> Option<Version> {
        let min = match self.low_op {
            Op::LessThanOrEqual => self.low,
            Op::LessThan => self.low.bump_patch()?,
        };
        self.satisfies(&min).then_some(min)
    }
}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            return write!(f, "{}", self.low);
        }
        write!(
            f,
            "{} {} v {} {}",
            self.low,
            self.low_op.as_str(),
            self.high_op.as_str(),
            self.high
        )
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Constraint::parse(&s).map_err(serde::de::Error::custom)
    }
}
