//! Parameters tweaked by user input.
//!
//! Every sample keeps a couple of values the keyboard can alter: a rotation angle, a number of
//! vertices, a mode to cycle through. They all come with a small rule (an angle wraps at 360°, a
//! polygon cannot have less than three vertices); those rules live here.

use std::fmt;

/// An angle in degrees, always kept in `[0; 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle(f32);

impl Angle {
  pub fn new(degrees: f32) -> Self {
    Angle(wrap_degrees(degrees))
  }

  pub fn degrees(self) -> f32 {
    self.0
  }

  /// Rotate by `delta` degrees, wrapping around.
  pub fn step(&mut self, delta: f32) {
    self.0 = wrap_degrees(self.0 + delta);
  }
}

impl From<Angle> for cgmath::Deg<f32> {
  fn from(a: Angle) -> Self {
    cgmath::Deg(a.0)
  }
}

impl fmt::Display for Angle {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}°", self.0)
  }
}

fn wrap_degrees(d: f32) -> f32 {
  let w = d.rem_euclid(360.);
  // rem_euclid can round up to exactly 360 for tiny negative inputs
  if w >= 360. {
    0.
  } else {
    w
  }
}

/// A count bounded by an inclusive range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Count {
  value: u32,
  min: u32,
  max: u32,
}

impl Count {
  /// Create a new count; `value` is clamped into `[min; max]`.
  pub fn new(value: u32, min: u32, max: u32) -> Self {
    let max = max.max(min);
    Count {
      value: value.clamp(min, max),
      min,
      max,
    }
  }

  pub fn get(self) -> u32 {
    self.value
  }

  /// Increase by one; returns whether the value changed.
  pub fn increment(&mut self) -> bool {
    self.add(1)
  }

  /// Decrease by one; returns whether the value changed.
  pub fn decrement(&mut self) -> bool {
    self.add(-1)
  }

  /// Move by `delta`, saturating at the bounds; returns whether the value changed.
  pub fn add(&mut self, delta: i64) -> bool {
    let next = (self.value as i64 + delta).clamp(self.min as i64, self.max as i64) as u32;
    let changed = next != self.value;
    self.value = next;
    changed
  }
}

impl fmt::Display for Count {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.value.fmt(f)
  }
}

/// Cycle through a fixed, non-empty list of values.
#[derive(Clone, Debug)]
pub struct Cycle<T> {
  values: Vec<T>,
  index: usize,
}

impl<T> Cycle<T> {
  /// Start at `first`, then go through `rest`.
  pub fn new(first: T, rest: impl IntoIterator<Item = T>) -> Self {
    let values = std::iter::once(first).chain(rest).collect();
    Cycle { values, index: 0 }
  }

  pub fn current(&self) -> &T {
    &self.values[self.index]
  }

  pub fn index(&self) -> usize {
    self.index
  }

  /// Move to the next value, going back to the first one after the last.
  pub fn next(&mut self) -> &T {
    self.index = (self.index + 1) % self.values.len();
    self.current()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn angle_wraps_both_ways() {
    let mut a = Angle::new(355.);
    a.step(10.);
    assert_eq!(a.degrees(), 5.);

    a.step(-10.);
    assert_eq!(a.degrees(), 355.);

    assert_eq!(Angle::new(720.).degrees(), 0.);
    assert_eq!(Angle::new(-90.).degrees(), 270.);
  }

  #[test]
  fn angle_never_reaches_360() {
    let a = Angle::new(-1e-7);
    assert!(a.degrees() < 360.);
  }

  #[test]
  fn count_saturates() {
    let mut n = Count::new(4, 3, 5);
    assert!(n.decrement());
    assert_eq!(n.get(), 3);
    assert!(!n.decrement());
    assert_eq!(n.get(), 3);

    assert!(n.add(10));
    assert_eq!(n.get(), 5);
    assert!(!n.increment());
  }

  #[test]
  fn count_clamps_initial_value() {
    assert_eq!(Count::new(1, 3, 10).get(), 3);
    assert_eq!(Count::new(20, 3, 10).get(), 10);
  }

  #[test]
  fn cycle_wraps() {
    let mut c = Cycle::new('a', vec!['b', 'c']);
    assert_eq!(*c.current(), 'a');
    assert_eq!(*c.next(), 'b');
    assert_eq!(*c.next(), 'c');
    assert_eq!(*c.next(), 'a');
    assert_eq!(c.index(), 0);

    let mut single = Cycle::new(1, None);
    assert_eq!(*single.next(), 1);
  }
}
