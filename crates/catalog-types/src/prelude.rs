pub use crate::fixture::{read_json_file, write_json_file, FixtureError};
pub use crate::id::{resolve_laptop_id, IdError};
pub use crate::laptop::{
    Cpu, Filter, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Panel, Rating,
    Resolution, Screen, Storage, StorageDriver, Weight,
};
pub use crate::message::*;
pub use crate::method;
pub use crate::role::Role;
pub use crate::signal::{CallSignal, Interrupted};
