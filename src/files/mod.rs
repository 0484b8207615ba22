//! Document store access.
//!
//! This module decides which file a request may touch and performs the
//! filesystem effect its method asks for.
//!
//! - **`authorizer`**: maps a request target to a resource under the document root
//! - **`dispatcher`**: runs the GET/HEAD/POST/PUT/DELETE handlers against that resource
//! - **`forms`**: the form-post endpoint (`CreateUser`, `Adder`)
//!
//! Writers are not serialized. Two requests changing the same file at the
//! same time may interleave their writes.

pub mod authorizer;
pub mod dispatcher;
pub mod forms;

pub use authorizer::{Authorization, Resource, authorize};
pub use dispatcher::dispatch;
