//! Path resolution
//!
//! String-level path derivations shared by every other component.

pub mod resolver;

pub use resolver::{
    EXTENSION_SEPARATOR, file_extension, file_name, file_name_without_extension, folder_name,
    parent_folder,
};
