//! Value model for sysrepo clients.
//!
//! This crate holds everything a change handler needs that does not touch
//! the native library:
//!
//! - [`error`]: [`SrStatus`] (the native `sr_error_t` codes) and [`TypesError`]
//! - [`types`]: the C enums (`SrType`, `SrNotifEvent`, `SrChangeOper`, `SrLogLevel`)
//! - [`value`]: owned values and typed payloads
//! - [`change`]: change values and routing to create/modify/delete handlers
//! - [`xpath`]: splitting xpaths into nodes and key predicates
//!
//! # Example
//!
//! ```
//! use sysrepo_types::{parse_xpath, xpath_from_nodes};
//!
//! let nodes = parse_xpath("/local-routing:static-routes/static[ip='10.0.0.0'][prefix-length='8']").unwrap();
//! assert_eq!(nodes[1].attr("prefix-length", ""), "8");
//! assert_eq!(xpath_from_nodes(&nodes), "/static-routes/static");
//! ```

pub mod change;
pub mod error;
pub mod types;
pub mod value;
pub mod xpath;

pub use change::{ChangeValHandler, SrChangeVal};
pub use error::{SrStatus, TypesError, TypesResult};
pub use types::{SrChangeOper, SrLogLevel, SrNotifEvent, SrType};
pub use value::{SrData, SrVal};
pub use xpath::{
    index_of_node, index_of_node_with_ns, node_names, node_names_with_ns, parse_xpath,
    parse_xpath_name, xpath_from_nodes, xpath_from_nodes_with_ns, XPathNode,
};
