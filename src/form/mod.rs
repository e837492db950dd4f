//! Form engine: structural tree, field construction, value tracking
//!
//! This module is host-agnostic. All side effects outside the tree go
//! through the capability traits in `crate::platform`.

mod error;
mod factory;
mod field;
mod page;
mod store;
mod tree;

pub use error::FormError;
pub use factory::InputListParams;
pub use field::{
    FieldDescriptor, FieldInitial, FieldKind, FieldOption, FieldWidget,
    DEFAULT_VALIDATION_MESSAGE,
};
pub use page::{ElementOptions, FormPage, PageConfig};
pub use store::{FieldValue, FormData, STORAGE_KEY};
pub use tree::{ContainerKind, FormTree, Node, NodeId, NodeKind};
