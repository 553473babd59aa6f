//! Time values and endpoint inclusivity.
//!
//! Timestamps are generic: any copyable, totally orderable value works for
//! storage and point/range queries. Operations that must do arithmetic on
//! time (snapshot partitioning, motif windows) take the stricter
//! [`TimeArith`] bound. Integers and floats are the supported domain.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Endpoint inclusivity for impulse-graph range queries.
///
/// `Both` means `begin <= t <= end`, `Left` means `begin <= t < end`,
/// `Right` means `begin < t <= end`, `Neither` means `begin < t < end`.
/// An unbounded side of a window is always satisfied regardless of mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusive {
    Both,
    Left,
    Right,
    Neither,
}

impl Inclusive {
    /// Whether the begin endpoint is inclusive.
    pub fn left(self) -> bool {
        matches!(self, Inclusive::Both | Inclusive::Left)
    }

    /// Whether the end endpoint is inclusive.
    pub fn right(self) -> bool {
        matches!(self, Inclusive::Both | Inclusive::Right)
    }
}

/// A timestamp value: copyable, totally orderable, and convertible to and
/// from a JSON attribute value.
///
/// The comparison is a total order even for floats (`f64::total_cmp`), so
/// time values can key ordered maps without panicking on NaN.
pub trait TimeValue: Copy + PartialOrd + fmt::Debug {
    /// Total-order comparison.
    fn cmp_time(&self, other: &Self) -> Ordering;

    /// Encode as a JSON attribute value (used by projections that stamp
    /// edges with their time data).
    fn to_attr(&self) -> serde_json::Value;

    /// Decode from a JSON attribute value.
    fn from_attr(value: &serde_json::Value) -> Option<Self>;

    /// `self < other` under the total order.
    fn before(&self, other: &Self) -> bool {
        self.cmp_time(other) == Ordering::Less
    }

    /// `self > other` under the total order.
    fn after(&self, other: &Self) -> bool {
        self.cmp_time(other) == Ordering::Greater
    }

    /// `self == other` under the total order.
    fn same(&self, other: &Self) -> bool {
        self.cmp_time(other) == Ordering::Equal
    }
}

macro_rules! impl_time_value_signed {
    ($($t:ty),*) => {$(
        impl TimeValue for $t {
            fn cmp_time(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }

            fn to_attr(&self) -> serde_json::Value {
                serde_json::Value::from(*self)
            }

            fn from_attr(value: &serde_json::Value) -> Option<Self> {
                value.as_i64().and_then(|v| Self::try_from(v).ok())
            }
        }
    )*};
}

macro_rules! impl_time_value_unsigned {
    ($($t:ty),*) => {$(
        impl TimeValue for $t {
            fn cmp_time(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }

            fn to_attr(&self) -> serde_json::Value {
                serde_json::Value::from(*self)
            }

            fn from_attr(value: &serde_json::Value) -> Option<Self> {
                value.as_u64().and_then(|v| Self::try_from(v).ok())
            }
        }
    )*};
}

impl_time_value_signed!(i8, i16, i32, i64, isize);
impl_time_value_unsigned!(u8, u16, u32, u64, usize);

impl TimeValue for f64 {
    fn cmp_time(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn to_attr(&self) -> serde_json::Value {
        serde_json::Value::from(*self)
    }

    fn from_attr(value: &serde_json::Value) -> Option<Self> {
        value.as_f64()
    }
}

impl TimeValue for f32 {
    fn cmp_time(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn to_attr(&self) -> serde_json::Value {
        serde_json::Value::from(f64::from(*self))
    }

    fn from_attr(value: &serde_json::Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

/// A time value that additionally supports the arithmetic needed for
/// snapshot partitioning and delta-windowed algorithms.
pub trait TimeArith: TimeValue + Add<Output = Self> + Sub<Output = Self> {
    /// The `index`-th boundary (0 ..= parts) of a fair partition of
    /// `[begin, end]` into `parts` consecutive windows.
    ///
    /// For integers this is `begin + (span * index) / parts`, which covers
    /// the span with no gaps even when it does not divide evenly.
    fn partition_boundary(begin: Self, end: Self, index: usize, parts: usize) -> Self;

    /// How many windows of `length` cover `[begin, end]` (the last one may
    /// be shorter). `None` if `length` is not strictly positive.
    fn parts_for_length(begin: Self, end: Self, length: Self) -> Option<usize>;
}

macro_rules! impl_time_arith_int {
    ($($t:ty),*) => {$(
        impl TimeArith for $t {
            fn partition_boundary(begin: Self, end: Self, index: usize, parts: usize) -> Self {
                let span = end - begin;
                begin + (span * index as $t) / parts as $t
            }

            fn parts_for_length(begin: Self, end: Self, length: Self) -> Option<usize> {
                if length <= 0 as $t {
                    return None;
                }
                let span = end - begin;
                let mut parts = span / length;
                if span % length != 0 as $t {
                    parts += 1 as $t;
                }
                Some(parts as usize)
            }
        }
    )*};
}

impl_time_arith_int!(i16, i32, i64, isize, u16, u32, u64, usize);

macro_rules! impl_time_arith_float {
    ($($t:ty),*) => {$(
        impl TimeArith for $t {
            fn partition_boundary(begin: Self, end: Self, index: usize, parts: usize) -> Self {
                begin + (end - begin) * (index as $t / parts as $t)
            }

            fn parts_for_length(begin: Self, end: Self, length: Self) -> Option<usize> {
                if !(length > 0 as $t) || !length.is_finite() {
                    return None;
                }
                Some(((end - begin) / length).ceil() as usize)
            }
        }
    )*};
}

impl_time_arith_float!(f32, f64);

/// Ordered-map key wrapper imposing the total order of [`TimeValue`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeKey<T>(pub T);

impl<T: TimeValue> PartialEq for TimeKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.same(&other.0)
    }
}

impl<T: TimeValue> Eq for TimeKey<T> {}

impl<T: TimeValue> PartialOrd for TimeKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TimeValue> Ord for TimeKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_time(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_endpoints() {
        assert!(Inclusive::Both.left() && Inclusive::Both.right());
        assert!(Inclusive::Left.left() && !Inclusive::Left.right());
        assert!(!Inclusive::Right.left() && Inclusive::Right.right());
        assert!(!Inclusive::Neither.left() && !Inclusive::Neither.right());
    }

    #[test]
    fn float_total_order_handles_nan() {
        assert_eq!(f64::NAN.cmp_time(&f64::NAN), Ordering::Equal);
        assert!(1.0f64.before(&f64::NAN));
    }

    #[test]
    fn integer_partition_covers_span() {
        // span 9 into 2 parts: boundaries 0, 4, 9, no gap at the end
        assert_eq!(i64::partition_boundary(0, 9, 0, 2), 0);
        assert_eq!(i64::partition_boundary(0, 9, 1, 2), 4);
        assert_eq!(i64::partition_boundary(0, 9, 2, 2), 9);
    }

    #[test]
    fn parts_for_length_rounds_up() {
        assert_eq!(i64::parts_for_length(0, 10, 3), Some(4));
        assert_eq!(i64::parts_for_length(0, 9, 3), Some(3));
        assert_eq!(i64::parts_for_length(0, 9, 0), None);
        assert_eq!(f64::parts_for_length(0.0, 9.0, 4.5), Some(2));
    }

    #[test]
    fn attr_round_trip() {
        let t = 42i64;
        assert_eq!(i64::from_attr(&t.to_attr()), Some(42));
        let f = 1.5f64;
        assert_eq!(f64::from_attr(&f.to_attr()), Some(1.5));
    }
}
