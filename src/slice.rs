// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{domain_error, out_of_range, ArrayError};

/// A slice (range with step size) for one array axis.
///
/// `end` is an exclusive index. Negative `start` or `end` indexes are
/// counted from the back of the axis; `end = None` means the full
/// axis length. A negative `step` walks the axis backwards, starting
/// from the last selected element.
///
/// See also the `From` impls, converting from ranges; for example
/// `Slice::from(1..)` or `Slice::from(1..3)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: isize,
    pub end: Option<isize>,
    pub step: isize,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    pub fn new(start: isize, end: Option<isize>, step: isize) -> Slice {
        debug_assert_ne!(step, 0, "Slice::new: step must be nonzero");
        Slice { start, end, step }
    }

    /// Create a new `Slice` with the given step size (multiplied with the
    /// previous step size).
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        debug_assert_ne!(step, 0, "Slice::step_by: step must be nonzero");
        Slice {
            step: self.step * step,
            ..self
        }
    }

    /// Resolve against an axis of length `len`, producing
    /// `(first element index, selected count, step)`.
    pub(crate) fn resolve(&self, len: usize) -> Result<(usize, usize, isize), ArrayError> {
        if self.step == 0 {
            return Err(domain_error("slice step must be nonzero"));
        }
        let abs = |i: isize| -> Result<usize, ArrayError> {
            let j = if i < 0 { i + len as isize } else { i };
            if j < 0 || j > len as isize {
                return Err(out_of_range(format!(
                    "slice index {} out of bounds for axis of length {}",
                    i, len
                )));
            }
            Ok(j as usize)
        };
        let start = abs(self.start)?;
        let end = match self.end {
            Some(e) => abs(e)?,
            None => len,
        };
        if start > end {
            return Err(out_of_range(format!(
                "slice start {} is past slice end {}",
                start, end
            )));
        }
        let span = end - start;
        let stepsize = self.step.unsigned_abs();
        let count = (span + stepsize - 1) / stepsize;
        if self.step > 0 {
            Ok((start, count, self.step))
        } else {
            // walk backwards from the last selected element
            let first = if count == 0 {
                start
            } else {
                start + (count - 1) * stepsize
            };
            Ok((first, count, self.step))
        }
    }
}

impl From<Range<isize>> for Slice {
    #[inline]
    fn from(r: Range<isize>) -> Slice {
        Slice {
            start: r.start,
            end: Some(r.end),
            step: 1,
        }
    }
}

impl From<RangeFrom<isize>> for Slice {
    #[inline]
    fn from(r: RangeFrom<isize>) -> Slice {
        Slice {
            start: r.start,
            end: None,
            step: 1,
        }
    }
}

impl From<RangeTo<isize>> for Slice {
    #[inline]
    fn from(r: RangeTo<isize>) -> Slice {
        Slice {
            start: 0,
            end: Some(r.end),
            step: 1,
        }
    }
}

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice {
            start: 0,
            end: None,
            step: 1,
        }
    }
}
