// microtonal -- scales beyond twelve tones, rendered as audio and MIDI
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Rational numbers are used for designating just intervals, e.g. `9/8` or `15/8`.

use std::{cmp::Ordering, fmt};

/// Underlying integral type for the rational numbers.
type Int = i64;

/// A rational number, always fully normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Rational {
    /// The numerator of the fraction.
    /// If the fraction is negative, the numerator will be made negative.
    num: Int,
    /// The denominator of the fraction.
    /// If the fraction is negative, the denominator will stay positive.
    denom: Int,
}

impl Rational {
    /// Create a new rational from a potentially unnormalized fraction.
    ///
    /// Usable in constant context, e.g. for the fixed interval tables of scales.
    ///
    /// # Panic
    ///
    /// Panics if the denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use microtonal::rational::*;
    ///
    /// assert_eq!(Rational::new(10, 5), Rational::new(2, 1));
    /// assert_eq!(Rational::new(-10, -5), Rational::new(6, 3));
    /// assert_eq!(Rational::new(-6, 8), Rational::new(3, -4));
    /// ```
    pub const fn new(num: Int, denom: Int) -> Rational {
        assert!(denom != 0, "Denominator must not be zero");

        let negative = (num < 0) != (denom < 0);
        let div = gcd(num, denom);
        let num = num.abs() / div;
        Rational {
            num: if negative { -num } else { num },
            denom: denom.abs() / div,
        }
    }

    pub const fn from_int(int: Int) -> Rational {
        Rational { num: int, denom: 1 }
    }

    pub fn numerator(self) -> Int {
        self.num
    }

    pub fn denominator(self) -> Int {
        self.denom
    }

    /// The value of the fraction as floating point number.
    ///
    /// ```
    /// use microtonal::rational::*;
    ///
    /// assert_eq!(Rational::new(9, 8).as_f64(), 1.125);
    /// ```
    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

/// ```
/// use microtonal::rational::*;
///
/// assert_eq!(Rational::new(15, 8).to_string(), "15/8");
/// assert_eq!(Rational::new(4, 2).to_string(), "2/1");
/// ```
impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ```
/// use microtonal::rational::*;
///
/// assert!(Rational::new(5, 4) < Rational::new(4, 3));
/// ```
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // a / b < c / d
        // <=>
        // a * d < c * b
        let l = self.num * other.denom;
        let r = other.num * self.denom;
        l.cmp(&r)
    }
}

/// An error which can be returned when parsing a rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRationalError(RationalErrorKind);

impl ParseRationalError {
    pub fn kind(&self) -> RationalErrorKind {
        self.0
    }
}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            RationalErrorKind::InvalidInt => write!(f, "invalid integer in fraction"),
            RationalErrorKind::Zero => write!(f, "denominator is zero"),
            RationalErrorKind::Malformed => write!(f, "expected `<int>` or `<int>/<int>`"),
        }
    }
}

impl std::error::Error for ParseRationalError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RationalErrorKind {
    /// The numerator or denominator could not be parsed as integer.
    InvalidInt,
    /// The denominator was zero
    Zero,
    /// The rational was not of the form `<int>` or `<int>/<int>
    Malformed,
}

/// ```
/// use microtonal::rational::*;
///
/// assert_eq!("9/8".parse(), Ok(Rational::new(9, 8)));
/// assert_eq!("2".parse(), Ok(Rational::from_int(2)));
/// assert_eq!("3/0".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::Zero);
/// ```
impl std::str::FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let numerator: Int = parts
            .next()
            .unwrap_or_default()
            .trim()
            .parse()
            .map_err(|_| ParseRationalError(RationalErrorKind::InvalidInt))?;

        // normalizing negates, which `Int::MIN` does not survive
        if numerator.checked_abs().is_none() {
            return Err(ParseRationalError(RationalErrorKind::Malformed));
        }

        match parts.next() {
            None => Ok(Rational::from_int(numerator)),
            Some(denominator_str) => {
                let denominator: Int = denominator_str
                    .trim()
                    .parse()
                    .map_err(|_| ParseRationalError(RationalErrorKind::InvalidInt))?;
                if denominator.checked_abs().is_none() {
                    Err(ParseRationalError(RationalErrorKind::Malformed))
                } else if denominator == 0 {
                    Err(ParseRationalError(RationalErrorKind::Zero))
                } else if parts.next().is_some() {
                    Err(ParseRationalError(RationalErrorKind::Malformed))
                } else {
                    Ok(Rational::new(numerator, denominator))
                }
            }
        }
    }
}

/// Computes the greates common divisor of two numbers using euclids algorithm.
///
/// # Example
///
/// ```
/// use microtonal::rational::*;
///
/// assert_eq!(gcd(20, 15), 5);
/// assert_eq!(gcd(20, 19), 1);
/// assert_eq!(gcd(10, 0), 10);
/// assert_eq!(gcd(0, 10), 10);
/// assert_eq!(gcd(10, -10), 10);
/// ```
pub const fn gcd(a: Int, b: Int) -> Int {
    // normalized inputs to be positive to guarantee that it terminates
    let mut a = a.abs();
    let mut b = b.abs();

    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
