//! Compile-time alignment queries and aligned raw storage.
//!
//! * [`AlignOf`] reports the alignment of any type, trait objects included.
//! * [`AlignedCharArray`] is a byte buffer of a const-generic alignment and size.
//! * [`AlignedCharArrayUnion`] is storage for any one of up to ten candidate types.

extern crate alignkit_proc_macro;
extern crate self as alignkit;
pub extern crate spin;

#[macro_use]
pub mod log;
#[macro_use]
pub mod align_of;
#[macro_use]
pub mod storage;
#[macro_use]
pub mod union;
pub mod util;
#[doc(hidden)]
pub mod testing;

pub use align_of::{align_of, AbstractBase, AlignOf};
pub use alignkit_proc_macro::*;
pub use storage::{Align, AlignedCharArray, Fits, RawStorage, SupportedAlignment};
pub use union::{AlignedCharArrayUnion, Filler};

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!(
    r#"
    ❌ Unsupported Platform.
    No known pointer width, so the alignment of pointer-sized and abstract types
    cannot be established. Supported pointer widths: 16, 32, 64.
"#
);
