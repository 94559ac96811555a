use crate::state::Address;

pub type Result<T> = std::result::Result<T, VmError>;

/// Everything that can go wrong while loading or stepping a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("Memory access out of bounds: {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("Program too large ({size} bytes), at most {max} bytes fit")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("Stack overflow: call depth exceeds {capacity}")]
    StackOverflow { capacity: usize },

    #[error("Stack underflow: No return address available")]
    StackUnderflow,

    #[error("Unsupported opcode: {0:#06X}")]
    UnsupportedOpcode(u16),

    #[error("Invalid key index: {0}")]
    InvalidKey(usize),
}

impl VmError {
    pub fn out_of_range(address: Address) -> Self {
        VmError::AddressOutOfRange { address }
    }

    /// An unsupported opcode is reported after the PC has already moved past
    /// it, so the driver may keep stepping. Every other kind leaves the
    /// machine mid-instruction.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, VmError::UnsupportedOpcode(_))
    }
}
