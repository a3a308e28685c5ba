//! Exclusive ownership of objects allocated by the CL primitives layer.
//!
//! A [`Handle`] owns exactly one primitive object and remembers whether it has
//! been released. Access after release fails with
//! [`ProofErrorKind::InvalidState`], a second release with
//! [`ProofErrorKind::DoubleFree`]. A handle still live when dropped releases
//! its object.

use std::fmt;

use crate::errors::prelude::*;

pub struct Handle<T> {
    name: &'static str,
    value: Option<Box<T>>,
}

impl<T> Handle<T> {
    pub(crate) fn new(name: &'static str, value: T) -> Handle<T> {
        trace!("Handle::new: {} acquired", name);

        Handle {
            name,
            value: Some(Box::new(value)),
        }
    }

    /// Name of the wrapped object kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_live(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn get(&self) -> ProofResult<&T> {
        match self.value.as_deref() {
            Some(value) => Ok(value),
            None => Err(self.released_error()),
        }
    }

    pub(crate) fn get_mut(&mut self) -> ProofResult<&mut T> {
        let name = self.name;
        match self.value.as_deref_mut() {
            Some(value) => Ok(value),
            None => Err(err_msg(
                ProofErrorKind::InvalidState,
                format!("{} has already been released", name),
            )),
        }
    }

    /// Moves the object out, leaving the handle released.
    pub(crate) fn take(&mut self) -> ProofResult<T> {
        match self.value.take() {
            Some(value) => {
                trace!("Handle::take: {} moved out", self.name);
                Ok(*value)
            }
            None => Err(self.released_error()),
        }
    }

    /// Releases the object now instead of at scope exit.
    pub fn free(&mut self) -> ProofResult<()> {
        match self.value.take() {
            Some(_) => {
                trace!("Handle::free: {} released", self.name);
                Ok(())
            }
            None => Err(err_msg(
                ProofErrorKind::DoubleFree,
                format!("{} has already been released", self.name),
            )),
        }
    }

    fn released_error(&self) -> ProofError {
        err_msg(
            ProofErrorKind::InvalidState,
            format!("{} has already been released", self.name),
        )
    }
}

impl<T> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.value.is_some() {
            trace!("Handle::drop: {} released on scope exit", self.name);
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("live", &self.is_live())
            .finish()
    }
}
