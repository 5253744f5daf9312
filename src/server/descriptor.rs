//! Static description of one server to run

use super::error::ServeError;
use axum::Router;

/// Address, handler and display name of one server
///
/// Immutable once built. The launcher shares it with the serving task.
#[derive(Clone)]
pub struct ServerDescriptor {
    name: String,
    address: String,
    router: Router,
}

impl ServerDescriptor {
    pub fn new(name: impl Into<String>, address: impl Into<String>, router: Router) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            router,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address as configured (`host:port`, `:port` or a bare port)
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Resolve the configured address into something `TcpListener::bind` accepts
    ///
    /// `:8080` and `8080` listen on all interfaces.
    pub fn bind_address(&self) -> Result<String, ServeError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ServeError::InvalidAddress {
                address: self.address.clone(),
            });
        }

        if let Some(port) = address.strip_prefix(':') {
            if port.is_empty() {
                return Err(ServeError::InvalidAddress {
                    address: self.address.clone(),
                });
            }
            return Ok(format!("0.0.0.0:{}", port));
        }

        if address.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(format!("0.0.0.0:{}", address));
        }

        Ok(address.to_string())
    }
}

impl std::fmt::Debug for ServerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDescriptor")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
