use crate::error::{Result, VmError};
use crate::state::{Address, STACK_CAPACITY};

/// Return addresses pushed by `2nnn` and popped by `00EE`.
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<Address>,
    capacity: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CallStack {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, addr: Address) -> Result<()> {
        if self.frames.len() >= self.capacity {
            return Err(VmError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.frames.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Address> {
        self.frames.pop().ok_or(VmError::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
