//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, bodies
//! framed only by Content-Length, no chunked encoding, no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: drives one client through the request-response state machine
//! - **`reader`**: reads the header block and the Content-Length framed body
//! - **`parser`**: turns the header block into a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: Content-Type lookup from file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read and parse the header block
//!        └──────┬──────┘
//!               │ Request parsed (framing errors skip to Writing with 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Authorize, read body, dispatch
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut down the stream
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
