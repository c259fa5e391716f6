// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error;
use std::fmt;

/// An error raised by an array operation.
///
/// Carries an [`ErrorKind`] for programmatic matching plus a
/// human-readable message describing the failing operands.
#[derive(Clone, Debug)]
pub struct ArrayError {
    kind: ErrorKind,
    msg: String,
}

/// Error code for an error raised by an array operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// incompatible shapes for broadcast, reshape or linear algebra
    ShapeMismatch,
    /// index or slice bound outside the array extent
    OutOfRange,
    /// matrix is singular or numerically too close to singular
    Singular,
    /// a narrowing conversion would silently lose information
    Representability,
    /// buffer allocation failed
    AllocationFailure,
    /// operand outside the mathematical domain of the operation
    DomainError,
}

impl ArrayError {
    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        ArrayError {
            kind,
            msg: msg.into(),
        }
    }

    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the diagnostic message of this error.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl PartialEq for ArrayError {
    #[inline]
    fn eq(&self, rhs: &Self) -> bool {
        self.kind == rhs.kind
    }
}

impl Error for ArrayError {}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ErrorKind::ShapeMismatch => "shape mismatch",
            ErrorKind::OutOfRange => "out of range",
            ErrorKind::Singular => "singular matrix",
            ErrorKind::Representability => "representability",
            ErrorKind::AllocationFailure => "allocation failure",
            ErrorKind::DomainError => "domain error",
        };
        write!(f, "{}: {}", prefix, self.msg)
    }
}

pub(crate) fn shape_mismatch(msg: impl Into<String>) -> ArrayError {
    ArrayError::new(ErrorKind::ShapeMismatch, msg)
}

pub(crate) fn out_of_range(msg: impl Into<String>) -> ArrayError {
    ArrayError::new(ErrorKind::OutOfRange, msg)
}

pub(crate) fn domain_error(msg: impl Into<String>) -> ArrayError {
    ArrayError::new(ErrorKind::DomainError, msg)
}

pub(crate) fn singular(msg: impl Into<String>) -> ArrayError {
    ArrayError::new(ErrorKind::Singular, msg)
}

pub(crate) fn representability(msg: impl Into<String>) -> ArrayError {
    ArrayError::new(ErrorKind::Representability, msg)
}

pub(crate) fn allocation_failure(len: usize) -> ArrayError {
    ArrayError::new(
        ErrorKind::AllocationFailure,
        format!("failed to allocate buffer of {} elements", len),
    )
}
