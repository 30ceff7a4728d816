//! Growable byte buffer with block-sized, fallible allocation.
//!
//! Input and output both go through a [`Buffer`]. Capacity always grows in
//! whole multiples of the configured unit, and every reservation uses
//! `try_reserve_exact`, so running out of memory surfaces as
//! [`ScidownError::Allocation`] (exit status 4) instead of aborting the
//! process.
//!
//! The buffer implements [`std::io::Write`] so a renderer can stream into it
//! directly. A failed reservation inside `write` is reported as
//! [`std::io::ErrorKind::OutOfMemory`]; [`Buffer::take_alloc_failure`] lets
//! the executor turn that back into an allocation error.

use crate::error::ScidownError;
use std::io;

/// A byte buffer that grows in steps of `unit` bytes.
#[derive(Debug)]
pub struct Buffer {
    data: Vec<u8>,
    unit: usize,
    what: &'static str,
    alloc_failure: Option<usize>,
}

impl Buffer {
    /// Create an empty buffer with `unit` bytes reserved.
    ///
    /// `what` names the buffer in allocation errors ("input buffer", ...).
    pub fn new(unit: usize, what: &'static str) -> Result<Self, ScidownError> {
        if unit == 0 {
            return Err(ScidownError::InvalidConfig(format!(
                "{what} unit must be ≥ 1"
            )));
        }
        let mut data = Vec::new();
        data.try_reserve_exact(unit)
            .map_err(|_| ScidownError::Allocation {
                what,
                requested: unit,
            })?;
        Ok(Self {
            data,
            unit,
            what,
            alloc_failure: None,
        })
    }

    /// Replace the contents with `bytes`.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), ScidownError> {
        self.data.clear();
        self.grow(bytes.len()).map_err(|requested| ScidownError::Allocation {
            what: self.what,
            requested,
        })?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `bytes`, growing by whole units.
    pub fn put(&mut self, bytes: &[u8]) -> Result<(), ScidownError> {
        self.grow(self.data.len() + bytes.len())
            .map_err(|requested| ScidownError::Allocation {
                what: self.what,
                requested,
            })?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Copy the contents into a freshly allocated, exactly sized vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, ScidownError> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.data.len())
            .map_err(|_| ScidownError::Allocation {
                what: "output copy",
                requested: self.data.len(),
            })?;
        out.extend_from_slice(&self.data);
        Ok(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The size of the last reservation `write` could not satisfy, if any.
    pub fn take_alloc_failure(&mut self) -> Option<ScidownError> {
        self.alloc_failure
            .take()
            .map(|requested| ScidownError::Allocation {
                what: self.what,
                requested,
            })
    }

    /// Ensure capacity for `needed` bytes, rounded up to a whole unit.
    ///
    /// On failure returns the capacity that was requested.
    fn grow(&mut self, needed: usize) -> Result<(), usize> {
        if needed <= self.data.capacity() {
            return Ok(());
        }
        let target = needed
            .div_ceil(self.unit)
            .checked_mul(self.unit)
            .ok_or(needed)?;
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| target)
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Err(requested) = self.grow(self.data.len() + buf.len()) {
            self.alloc_failure = Some(requested);
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("{} could not grow to {requested} bytes", self.what),
            ));
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
