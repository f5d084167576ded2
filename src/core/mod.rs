pub mod native_fns;
pub mod special_forms;

pub use native_fns::{NativeFn, NativeRegistry};
pub use special_forms::SpecialFormRegistry;
