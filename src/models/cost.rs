//! Integer cost quantity and typed identifiers.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// An integer quantity used for durations, costs, capacities, fuel and
/// distances.
///
/// Values are non-negative at rest, but intermediate arithmetic may go
/// negative (e.g. fuel subtracted before a bound check).
///
/// # Examples
///
/// ```
/// use u_transport::models::Cost;
///
/// let a = Cost::new(20);
/// let b = Cost::new(5);
/// assert_eq!(a + b, Cost::new(25));
/// assert_eq!(b - a, Cost::new(-15));
/// assert!(a > b);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cost(i32);

impl Cost {
    /// Zero cost.
    pub const ZERO: Cost = Cost(0);

    /// Unit cost.
    pub const ONE: Cost = Cost(1);

    /// Wraps a raw integer value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns `true` if the value is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<i32> for Cost {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.0 += rhs.0;
    }
}

impl Sub for Cost {
    type Output = Cost;

    fn sub(self, rhs: Cost) -> Cost {
        Cost(self.0 - rhs.0)
    }
}

impl SubAssign for Cost {
    fn sub_assign(&mut self, rhs: Cost) {
        self.0 -= rhs.0;
    }
}

impl Neg for Cost {
    type Output = Cost;

    fn neg(self) -> Cost {
        Cost(-self.0)
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Cost {
        iter.copied().sum()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Creates an id from a dense index.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the dense index.
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

typed_id!(
    /// Index of a location in a [`RoadNetwork`](super::RoadNetwork).
    LocationId
);
typed_id!(
    /// Index of a road in a [`RoadNetwork`](super::RoadNetwork).
    RoadId
);
typed_id!(
    /// Index of a vehicle in a [`WorldState`](super::WorldState).
    VehicleId
);
typed_id!(
    /// Index of a package in a [`WorldState`](super::WorldState).
    PackageId
);
