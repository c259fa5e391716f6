// Copyright 2025 numarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Linear algebra on matrix-shaped arrays: matrix product, QR
//! decomposition by Householder reflections, least-squares/exact
//! solving, matrix power and linear regression.

mod impl_linalg;

pub use self::impl_linalg::{linreg, LinReg};
