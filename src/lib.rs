//! # mybind — MySQL binary protocol value binding
//!
//! Turns native Rust values into prepared-statement parameters: a
//! [`BoundDescriptor`] (wire type, unsigned flag, indirection, declared
//! length) and the exact bytes the binary protocol expects.
//!
//! ## Quick Example
//!
//! ```rust
//! use mybind::prelude::*;
//!
//! let value = 6u32;
//! let descriptor = mybind::bind(&value);
//! assert_eq!(descriptor.wire_type, WireType::LONG.unsigned());
//! assert_eq!(descriptor.length, Length::Fixed(4));
//!
//! let mut buf = Vec::new();
//! mybind::write(&mut buf, &descriptor, &value.to_param()).unwrap();
//! assert_eq!(buf, [6, 0, 0, 0]);
//! ```
//!
//! ## Mapping
//!
//! | Rust                    | Wire type          | Length |
//! |-------------------------|--------------------|--------|
//! | `()`                    | NULL               | 0      |
//! | `i8`/`u8`               | TINY               | 1      |
//! | `i16`/`u16`             | SHORT              | 2      |
//! | `i32`/`u32`             | LONG               | 4      |
//! | `i64`/`u64`             | LONGLONG           | 8      |
//! | `isize`/`usize`         | LONG               | 4      |
//! | `f32`, `Real`           | FLOAT              | 4      |
//! | `f64`                   | DOUBLE             | 8      |
//! | `[u8]`, `Vec<u8>`       | VAR_STRING         | var    |
//! | `str`, `String`         | STRING             | var    |
//! | `Blob`                  | BLOB               | var    |
//! | `Datetime`              | DATETIME           | var    |
//! | `Timestamp`             | TIMESTAMP          | var    |
//! | `Raw`                   | caller's code      | var    |
//!
//! Unsigned types set [`WireType::UNSIGNED_MASK`]. `isize`, `usize` and
//! `Real` follow the binder's [`WidthPolicy`]; the default keeps them at
//! 32 bits, truncating wider values.
//!
//! `&T` and `Option<&T>` bind like `T` with `indirect` set, whether or not
//! the reference resolves. An unresolved reference writes nothing; the
//! caller's NULL bitmap must mark it.

pub mod binder;
pub mod codec;
pub mod config;
pub mod error;
pub mod literal;
pub mod param;
pub mod temporal;
pub mod types;
pub mod writer;

pub use binder::{Binder, WidthPolicy};
pub use config::BindConfig;
pub use error::{BindError, BindResult};
pub use literal::{Literal, parse_literal};
pub use param::{Blob, Param, ParamType, Raw, Real, Scalar, ToParam};
pub use temporal::{Datetime, Timestamp};
pub use types::{BoundDescriptor, Kind, Length, WireType};
pub use writer::{Bound, encoded_len, write, write_param_types, write_params};

pub mod prelude {
    pub use crate::binder::{Binder, WidthPolicy};
    pub use crate::error::*;
    pub use crate::param::{Blob, Param, Raw, Real, ToParam};
    pub use crate::temporal::{Datetime, Timestamp};
    pub use crate::types::{BoundDescriptor, Kind, Length, WireType};
    pub use crate::writer::Bound;
}

/// Bind a native value with the default (narrow) width policy.
///
/// # Example
///
/// ```
/// use mybind::{bind, WireType};
///
/// let missing: Option<&String> = None;
/// let d = bind(&missing);
/// assert_eq!(d.wire_type, WireType::STRING);
/// assert!(d.indirect);
/// ```
pub fn bind<V: ToParam + ?Sized>(value: &V) -> BoundDescriptor {
    Binder::default().bind_value(value)
}

/// Bind a value whose type is only known at runtime.
///
/// Fails with [`BindError::UnsupportedType`] for types with no wire
/// mapping and for more than one level of indirection.
pub fn bind_any<T: std::any::Any>(value: &T) -> BindResult<BoundDescriptor> {
    Ok(Binder::default().bind(&Param::from_any(value)?))
}
