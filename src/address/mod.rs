//! Range-aware address model.
//!
//! # Structure
//! ```text
//! Address   = Grouping + optional zone (IPv6 only)
//! Grouping  = [Division; n] + optional prefix length   (n * bits <= 128)
//! Division  = RangeValue + bit count                   (bits <= 64)
//! ```
//!
//! Every level may be multivalued. A CIDR block such as `10.1.0.0/16` is the
//! grouping `10.1.0-255.0-255` carrying prefix length 16, so block questions
//! ("is this exactly one prefix block", "what is the smallest block prefix")
//! are answered from the division bounds in closed form.

#[allow(clippy::module_inception)]
pub mod address;
pub mod display;
pub mod division;
pub mod grouping;
pub(crate) mod intern;
pub mod range;

pub use address::{Address, AddressFamily};
pub use division::Division;
pub use grouping::{AddressCount, Grouping, GroupingKind};
pub use range::RangeValue;
