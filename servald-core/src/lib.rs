//! Daemon interface types for the Serval DNA client.
//!
//! Defines the REST endpoint configuration, opaque source locators, the
//! interface-malfunction error family, and validation of raw REST
//! responses. Subsystem crates such as `servald-rhizome` build their own
//! error families on top of these and keep them disjoint from
//! [`InterfaceError`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod locator;
pub mod response;

pub use config::RestfulConfig;
pub use error::{Classify, ConfigError, ErrorClass, InterfaceError, InterfaceMalfunction};
pub use locator::SourceLocator;
pub use response::RestfulResponse;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + 'static>() {}

    #[test]
    fn public_types_are_send_and_sync() {
        assert_send_sync::<SourceLocator>();
        assert_send_sync::<RestfulConfig>();
        assert_send_sync::<InterfaceError>();
        assert_send_sync::<RestfulResponse>();
    }

    #[test]
    fn endpoint_locator_flows_into_interface_error() {
        let config = RestfulConfig::default();
        let url = match config.endpoint("restful/rhizome/bundlelist.json", &[]) {
            Ok(u) => u,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let err = match RestfulResponse::from_parts(url.clone(), 200, None, b"") {
            Ok(r) => panic!("expected an error, got {r:?}"),
            Err(e) => e,
        };
        assert_eq!(err.url(), &url);
        assert!(err
            .to_string()
            .contains("http://127.0.0.1:4110/restful/rhizome/bundlelist.json"));
    }
}
