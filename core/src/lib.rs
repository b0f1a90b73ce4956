pub mod core;
pub mod cpu;
pub mod debugger;
pub mod device;
pub mod platform;
pub mod sync;
pub mod via;

pub mod prelude {
    pub use crate::core::bus::{MemoryBus, MemoryBusDevice, MemoryRange};
    pub use crate::core::engine::{
        AudioContext, EmuEvent, EmuEvents, EngineClient, Input, Line, RenderContext, Vec2,
    };
    pub use crate::core::error::{EmuError, EmuResult, ErrorHandler, ErrorPolicy};
    pub use crate::core::Cycles;
    pub use crate::cpu::Cpu;
    pub use crate::debugger::Debugger;
    pub use crate::sync::{Standalone, SyncProtocol};
    pub use crate::via::Via;
}
