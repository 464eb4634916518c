#![deny(clippy::all)]
#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]

pub mod dynamic_array;
pub mod error;
pub mod hash_table;
pub mod hasher;

pub use dynamic_array::DynamicArray;
pub use error::{ContainerError, Result};
pub use hash_table::{HashTable, TableStats};
