//! Client configuration with builder pattern.
//!
//! Construction-time configuration for a catalog client:
//! - Domain and environment scoping every record operation
//! - The gRPC endpoint and an optional authority override
//! - Optional HMAC signing configuration
//! - Connection establishment timeout
//!
//! There is deliberately no per-operation timeout: every store operation is
//! one send and one receive on a long-lived stream, and deadlines are the
//! caller's to scope.

use std::time::Duration;

use snafu::ensure;

use crate::error::{ConfigSnafu, Result};

/// Default connection establishment timeout (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`CatalogClient`](crate::CatalogClient).
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Top-level product namespace (e.g. `"ccip"`).
    pub(crate) domain: String,

    /// Deployment stage within the domain (e.g. `"staging"`).
    pub(crate) environment: String,

    /// Server endpoint URL (e.g. `http://localhost:50051`).
    pub(crate) endpoint: String,

    /// Authority override for HMAC signing. When unset, the authority is
    /// derived from the endpoint.
    pub(crate) authority: Option<String>,

    /// HMAC signing configuration; `None` disables request signing.
    pub(crate) hmac: Option<HmacConfig>,

    /// TLS configuration; `None` means plaintext.
    pub(crate) tls: Option<TlsConfig>,

    /// Connection establishment timeout.
    pub(crate) connect_timeout: Duration,
}

impl CatalogConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Returns the domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the environment.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HMAC configuration if signing is enabled.
    #[must_use]
    pub fn hmac(&self) -> Option<&HmacConfig> {
        self.hmac.as_ref()
    }

    /// Returns the TLS configuration if secure transport is enabled.
    #[must_use]
    pub fn tls(&self) -> Option<&TlsConfig> {
        self.tls.as_ref()
    }

    /// Returns the connection timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Resolves the authority value used for HMAC signing.
    ///
    /// Precedence: the HMAC config's authority, then the client-level
    /// override, then the host parsed from the endpoint. The resolved value
    /// must equal the `:authority` the server observes or signature
    /// verification fails — that is a configuration invariant, not checked
    /// at runtime.
    pub fn signing_authority(&self) -> Result<String> {
        if let Some(hmac) = &self.hmac {
            if let Some(authority) = &hmac.authority {
                return Ok(authority.clone());
            }
        }
        if let Some(authority) = &self.authority {
            return Ok(authority.clone());
        }
        authority_from_endpoint(&self.endpoint)
    }
}

/// HMAC signing configuration.
///
/// Identifies the remote signing key; the client never holds key material.
#[derive(Debug, Clone)]
pub struct HmacConfig {
    /// Remote signing key identifier.
    pub key_id: String,
    /// Region or locality hint for the signing service.
    pub key_region: String,
    /// Authority to sign; overrides derivation from the endpoint.
    pub authority: Option<String>,
}

impl HmacConfig {
    /// Creates a config for the given key, deriving the authority from the
    /// client endpoint.
    #[must_use]
    pub fn new(key_id: impl Into<String>, key_region: impl Into<String>) -> Self {
        Self { key_id: key_id.into(), key_region: key_region.into(), authority: None }
    }

    /// Pins the authority used in signatures.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }
}

/// TLS configuration for secure connections.
///
/// When set, endpoints should use `https://` URLs. Verification uses the
/// roots enabled at build time plus an optional extra CA certificate.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Additional CA certificate trusted for this connection.
    pub(crate) ca_cert: Option<CertificateData>,
    /// Domain name to verify the server certificate against, when it
    /// differs from the endpoint host.
    pub(crate) domain_name: Option<String>,
}

impl TlsConfig {
    /// TLS with the default trust roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusts an additional CA certificate read from a PEM file at connect
    /// time.
    #[must_use]
    pub fn with_ca_cert_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.ca_cert = Some(CertificateData::Path(path.into()));
        self
    }

    /// Trusts an additional CA certificate given as PEM bytes.
    #[must_use]
    pub fn with_ca_cert_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_cert = Some(CertificateData::Pem(pem.into()));
        self
    }

    /// Overrides the domain name used for certificate verification.
    #[must_use]
    pub fn with_domain_name(mut self, domain: impl Into<String>) -> Self {
        self.domain_name = Some(domain.into());
        self
    }
}

/// A CA certificate, by path or inline.
#[derive(Debug, Clone)]
pub enum CertificateData {
    /// PEM file read at connect time.
    Path(std::path::PathBuf),
    /// PEM bytes held inline.
    Pem(Vec<u8>),
}

/// Builder for [`CatalogConfig`].
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    domain: Option<String>,
    environment: Option<String>,
    endpoint: Option<String>,
    authority: Option<String>,
    hmac: Option<HmacConfig>,
    tls: Option<TlsConfig>,
    connect_timeout: Option<Duration>,
}

impl CatalogConfigBuilder {
    /// Sets the domain scoping all records.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the environment scoping all records.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Sets the server endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the authority used for HMAC signing.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Enables HMAC request signing.
    #[must_use]
    pub fn with_hmac(mut self, hmac: HmacConfig) -> Self {
        self.hmac = Some(hmac);
        self
    }

    /// Enables TLS for the connection.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Sets the connection establishment timeout.
    ///
    /// Default: 5 seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain, environment, or endpoint is missing
    /// or empty, the endpoint is not an HTTP(S) URL, the connect timeout is
    /// zero, or the HMAC key fields are empty.
    pub fn build(self) -> Result<CatalogConfig> {
        let domain = self
            .domain
            .ok_or_else(|| ConfigSnafu { message: "domain is required" }.build())?;
        ensure!(!domain.is_empty(), ConfigSnafu { message: "domain cannot be empty" });

        let environment = self
            .environment
            .ok_or_else(|| ConfigSnafu { message: "environment is required" }.build())?;
        ensure!(!environment.is_empty(), ConfigSnafu { message: "environment cannot be empty" });

        let endpoint = self
            .endpoint
            .ok_or_else(|| ConfigSnafu { message: "endpoint is required" }.build())?;
        validate_url(&endpoint)?;

        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        ensure!(
            !connect_timeout.is_zero(),
            ConfigSnafu { message: "connect_timeout cannot be zero" }
        );

        if let Some(hmac) = &self.hmac {
            ensure!(!hmac.key_id.is_empty(), ConfigSnafu { message: "hmac key_id cannot be empty" });
            ensure!(
                !hmac.key_region.is_empty(),
                ConfigSnafu { message: "hmac key_region cannot be empty" }
            );
        }

        Ok(CatalogConfig {
            domain,
            environment,
            endpoint,
            authority: self.authority,
            hmac: self.hmac,
            tls: self.tls,
            connect_timeout,
        })
    }
}

/// Validates that a URL is well-formed HTTP(S).
fn validate_url(url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return ConfigSnafu { message: format!("endpoint {url:?} must start with http:// or https://") }
            .fail();
    }

    let rest = url.strip_prefix("http://").or_else(|| url.strip_prefix("https://")).unwrap_or("");

    if rest.is_empty() {
        return ConfigSnafu { message: format!("endpoint {url:?} must have a host") }.fail();
    }

    if rest.contains(char::is_whitespace) {
        return ConfigSnafu { message: format!("endpoint {url:?} cannot contain whitespace") }.fail();
    }

    Ok(())
}

/// Derives the HMAC signing authority from an endpoint.
///
/// Strips the URL scheme, any path, and a trailing numeric port, so
/// `https://grpc.example.com:443` and `grpc.example.com:443` both resolve to
/// `grpc.example.com`.
pub fn authority_from_endpoint(endpoint: &str) -> Result<String> {
    let rest = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    let rest = rest.split('/').next().unwrap_or(rest);
    let host = match rest.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => rest,
    };
    ensure!(!host.is_empty(), ConfigSnafu { message: format!("endpoint {endpoint:?} has no host") });
    Ok(host.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_builder() -> CatalogConfigBuilder {
        CatalogConfig::builder()
            .with_domain("ccip")
            .with_environment("staging")
            .with_endpoint("http://localhost:50051")
    }

    #[test]
    fn builder_applies_defaults() {
        let config = base_builder().build().expect("valid config");
        assert_eq!(config.domain(), "ccip");
        assert_eq!(config.environment(), "staging");
        assert_eq!(config.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
        assert!(config.hmac().is_none());
    }

    #[test]
    fn build_requires_domain() {
        let result = CatalogConfig::builder()
            .with_environment("staging")
            .with_endpoint("http://localhost:50051")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_empty_environment() {
        let result = base_builder().with_environment("").build();
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_bad_scheme() {
        let result = base_builder().with_endpoint("grpc://localhost:50051").build();
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_zero_connect_timeout() {
        let result = base_builder().with_connect_timeout(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_empty_hmac_key() {
        let result = base_builder().with_hmac(HmacConfig::new("", "global")).build();
        assert!(result.is_err());
    }

    #[test]
    fn authority_strips_scheme_and_port_identically() {
        // Deriving from a URL and from a bare host:port must agree.
        let from_url = authority_from_endpoint("https://grpc.example.com:443").unwrap();
        let from_host_port = authority_from_endpoint("grpc.example.com:443").unwrap();
        assert_eq!(from_url, from_host_port);
        assert_eq!(from_url, "grpc.example.com");
    }

    #[test]
    fn authority_keeps_bare_host() {
        assert_eq!(authority_from_endpoint("grpc.example.com").unwrap(), "grpc.example.com");
    }

    #[test]
    fn authority_ignores_path() {
        assert_eq!(
            authority_from_endpoint("https://grpc.example.com:443/some/path").unwrap(),
            "grpc.example.com"
        );
    }

    #[test]
    fn tls_config_carries_through_build() {
        let config = base_builder()
            .with_endpoint("https://grpc.example.com:443")
            .with_tls(TlsConfig::new().with_domain_name("grpc.example.com"))
            .build()
            .unwrap();
        let tls = config.tls().expect("tls configured");
        assert_eq!(tls.domain_name.as_deref(), Some("grpc.example.com"));
        assert!(tls.ca_cert.is_none());
    }

    #[test]
    fn signing_authority_prefers_hmac_override() {
        let config = base_builder()
            .with_authority("client.example.com")
            .with_hmac(HmacConfig::new("key-1", "global").with_authority("pinned.example.com"))
            .build()
            .unwrap();
        assert_eq!(config.signing_authority().unwrap(), "pinned.example.com");
    }

    #[test]
    fn signing_authority_falls_back_to_endpoint_host() {
        let config = base_builder().build().unwrap();
        assert_eq!(config.signing_authority().unwrap(), "localhost");
    }
}
