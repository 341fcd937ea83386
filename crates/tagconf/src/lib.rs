//! Tagged-section configuration trees with path lookups.
//!
//! Configuration files nest sections as tags and hold `key=value` lines
//! inside them:
//!
//! ```text
//! <server>
//!     # comment lines start with '#'
//!     app = Demo
//!     <adapters>
//!         <Demo.TcpAdapter>
//!             endpoint = tcp -h 127.0.0.1 -p 10015
//!             threads = 4
//!         </Demo.TcpAdapter>
//!     </adapters>
//! </server>
//! ```
//!
//! # Overview
//!
//! The main types are:
//! - [`Conf`]: A loaded, reloadable configuration with typed lookups
//! - [`Element`]: A section ([`ElementKind::Node`]) or value ([`ElementKind::Leaf`])
//! - [`Error`]: I/O, format and lookup failures
//!
//! # Example
//!
//! ```rust
//! use tagconf::Conf;
//!
//! let conf: Conf = r#"<server>
//!     app = Demo
//!     <adapters>
//!         <Demo.TcpAdapter>
//!             endpoint = tcp -h 127.0.0.1 -p 10015
//!             threads = 4
//!         </Demo.TcpAdapter>
//!     </adapters>
//! </server>"#
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(conf.get_string("/server/app"), "Demo");
//! assert_eq!(conf.get_domain("/server/adapters"), vec!["Demo.TcpAdapter"]);
//! assert_eq!(conf.get_int("/server/adapters/Demo.TcpAdapter<threads>"), 4);
//!
//! let adapter = conf.get_map("/server/adapters/Demo.TcpAdapter");
//! assert_eq!(adapter["endpoint"], "tcp -h 127.0.0.1 -p 10015");
//! ```
//!
//! See the [`path`] module for the addressing rules.

pub mod conf;
pub mod error;
pub mod parser;
pub mod path;
pub mod types;

// Re-export main types
pub use conf::Conf;
pub use error::{Error, Result};
pub use indexmap::IndexMap;
pub use parser::{parse, parse_bytes};
pub use types::{Element, ElementKind, ROOT_NAME};
