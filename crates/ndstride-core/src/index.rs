//! Index expressions for slicing
//!
//! An index expression is a slice of [`Idx`] components, one per leading
//! axis. Omitted trailing axes select their full extent.

use crate::error::{NdError, Result};

/// One component of an index expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idx {
    /// Select a single position, removing the axis.
    At(isize),
    /// Select `start..stop` every `step`, keeping the axis. `None` bounds
    /// take their defaults for the direction of `step`.
    Range {
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    },
}

/// An [`Idx`] resolved against a concrete axis length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelection {
    Single(usize),
    Slice { start: usize, step: isize, len: usize },
}

impl Idx {
    /// `:`, the whole axis.
    pub const FULL: Idx = Idx::Range {
        start: None,
        stop: None,
        step: 1,
    };

    pub fn at(index: isize) -> Self {
        Idx::At(index)
    }

    pub fn range(start: isize, stop: isize) -> Self {
        Idx::Range {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }

    /// `start:`
    pub fn starting(start: isize) -> Self {
        Idx::Range {
            start: Some(start),
            stop: None,
            step: 1,
        }
    }

    /// `:stop`
    pub fn until(stop: isize) -> Self {
        Idx::Range {
            start: None,
            stop: Some(stop),
            step: 1,
        }
    }

    /// `start:stop:step` with optional bounds.
    pub fn slice(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Idx::Range { start, stop, step }
    }

    /// `::step`
    pub fn step(step: isize) -> Self {
        Idx::Range {
            start: None,
            stop: None,
            step,
        }
    }

    /// Normalize against an axis of length `len`.
    ///
    /// Negative positions count from the end. Positions are never clamped:
    /// an `At` outside `[-len, len)` or a range bound outside `[-len, len]`
    /// is an error.
    pub fn resolve(&self, axis: usize, len: usize) -> Result<AxisSelection> {
        let len_i = len as isize;
        let out_of_bounds = |index: isize| NdError::IndexOutOfBounds {
            index,
            axis,
            size: len,
        };

        match *self {
            Idx::At(index) => {
                let pos = if index < 0 { index + len_i } else { index };
                if pos < 0 || pos >= len_i {
                    return Err(out_of_bounds(index));
                }
                Ok(AxisSelection::Single(pos as usize))
            }
            Idx::Range { start, stop, step } => {
                if step == 0 {
                    return Err(NdError::InvalidArgument(
                        "slice step cannot be zero".to_string(),
                    ));
                }
                let bound = |b: isize| -> Result<isize> {
                    let pos = if b < 0 { b + len_i } else { b };
                    if pos < 0 || pos > len_i {
                        return Err(out_of_bounds(b));
                    }
                    Ok(pos)
                };

                let (start, count) = if step > 0 {
                    let start = start.map(bound).transpose()?.unwrap_or(0);
                    let stop = stop.map(bound).transpose()?.unwrap_or(len_i);
                    let count = if stop > start {
                        (stop - start + step - 1) / step
                    } else {
                        0
                    };
                    (start, count)
                } else {
                    // Walking backwards the first element is at most len - 1
                    // and the default stop lies before position 0.
                    let start = start
                        .map(bound)
                        .transpose()?
                        .map_or(len_i - 1, |s| s.min(len_i - 1));
                    let stop = stop.map(bound).transpose()?.unwrap_or(-1);
                    let count = if start > stop {
                        (start - stop - step - 1) / -step
                    } else {
                        0
                    };
                    (start, count)
                };

                Ok(AxisSelection::Slice {
                    start: if count > 0 { start as usize } else { 0 },
                    step,
                    len: count as usize,
                })
            }
        }
    }
}

impl From<isize> for Idx {
    fn from(index: isize) -> Self {
        Idx::At(index)
    }
}

impl From<std::ops::Range<isize>> for Idx {
    fn from(r: std::ops::Range<isize>) -> Self {
        Idx::range(r.start, r.end)
    }
}

impl From<std::ops::RangeFrom<isize>> for Idx {
    fn from(r: std::ops::RangeFrom<isize>) -> Self {
        Idx::starting(r.start)
    }
}

impl From<std::ops::RangeTo<isize>> for Idx {
    fn from(r: std::ops::RangeTo<isize>) -> Self {
        Idx::until(r.end)
    }
}

impl From<std::ops::RangeFull> for Idx {
    fn from(_: std::ops::RangeFull) -> Self {
        Idx::FULL
    }
}
