use crate::types::ComponentId;
use thiserror::Error as ThisError;

///
/// AllocatorError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum AllocatorError {
    #[error("component id space exhausted at {0}")]
    Exhausted(ComponentId),
}

///
/// ComponentIdAllocator
///
/// Hands out ids from a persisted watermark. Ids are never returned to the
/// pool, so the watermark only ever moves up; `u32::MAX` is kept as the
/// exhausted sentinel and never issued.
///

#[derive(Debug)]
pub struct ComponentIdAllocator {
    next: ComponentId,
    issued: u32,
}

impl ComponentIdAllocator {
    #[must_use]
    pub const fn new(start: ComponentId) -> Self {
        Self {
            next: start,
            issued: 0,
        }
    }

    /// Return the current id and advance.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<ComponentId, AllocatorError> {
        let id = self.next;
        let advanced = id
            .get()
            .checked_add(1)
            .ok_or(AllocatorError::Exhausted(id))?;

        self.next = ComponentId::new(advanced);
        self.issued = self.issued.saturating_add(1);

        Ok(id)
    }

    /// The id the next call to `next` would return.
    #[must_use]
    pub const fn peek(&self) -> ComponentId {
        self.next
    }

    /// How many ids this allocator has issued.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }
}

///
/// TESTS
///
