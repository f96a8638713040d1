//! HTTP-like request handling over a line-oriented transport.
//!
//! Not a general HTTP server: only the request line is inspected, one
//! request is served per connection, and every reply is `200 OK`.
//!
//! | Module       | Role                                          |
//! |--------------|-----------------------------------------------|
//! | `transport`  | `Transport` / `Connection` capability traits  |
//! | `request`    | bounded line reader, verb resolution          |
//! | `response`   | fixed-format reply rendering                  |
//! | `dispatcher` | one poll-and-dispatch step per loop tick      |

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod transport;
