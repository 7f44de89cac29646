//! Card system: catalog definitions, runtime instances, and lookup.
//!
//! ## Key Types
//!
//! - `CardCode`: Catalog code (passcode); `0` means hidden
//! - `CardDefinition`: Static card data with generic attributes
//! - `Card`: Runtime card state (zone, index, position, counters)
//! - `CardCatalog`: Read-only code lookup, shared between duels
//! - `CardRegistry`: In-memory catalog

pub mod attributes;
pub mod definition;
pub mod instance;
pub mod registry;

pub use attributes::{AttributeValue, Attributes};
pub use definition::{CardCode, CardDefinition};
pub use instance::Card;
pub use registry::{CardCatalog, CardRegistry};
