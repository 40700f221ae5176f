//! I/O helpers shared by the encoder and the writer.

pub mod copy;
pub mod counting;

pub use copy::CopyBuffer;
pub use copy::CopyOutcome;
pub use copy::copy_exact;
pub use counting::CountingWriter;
