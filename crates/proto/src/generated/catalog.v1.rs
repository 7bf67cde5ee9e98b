// @generated
/// Scopes every record to a domain (product namespace) and an environment
/// (deployment stage) within it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Scope {
    #[prost(string, tag = "1")]
    pub domain: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub environment: ::prost::alloc::string::String,
}
/// Status embedded in every response payload. Codes mirror google.rpc.Code;
/// detail payloads are preserved for client-side error matching.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseStatus {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub details: ::prost::alloc::vec::Vec<::prost_types::Any>,
}
/// One deployed contract instance. (chain_selector, contract_type, version,
/// qualifier) is the natural key; address and labels are the payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReference {
    #[prost(uint64, tag = "1")]
    pub chain_selector: u64,
    #[prost(string, tag = "2")]
    pub contract_type: ::prost::alloc::string::String,
    /// Semantic version string.
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub qualifier: ::prost::alloc::string::String,
    /// Chain-family-specific encoding; opaque to the catalog.
    #[prost(string, tag = "5")]
    pub address: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "6")]
    pub labels: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Server-assigned row version for optimistic concurrency. On edits this
    /// carries the version the client last observed.
    #[prost(uint64, tag = "7")]
    pub row_version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReferenceKey {
    #[prost(uint64, tag = "1")]
    pub chain_selector: u64,
    #[prost(string, tag = "2")]
    pub contract_type: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub qualifier: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReferenceFindRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    /// When absent, all references in scope match.
    #[prost(message, optional, tag = "2")]
    pub key: ::core::option::Option<AddressReferenceKey>,
    /// Read committed state, bypassing any transaction open on this session.
    #[prost(bool, tag = "3")]
    pub ignore_transaction: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReferenceFindResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, repeated, tag = "2")]
    pub references: ::prost::alloc::vec::Vec<AddressReference>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReferenceEditRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(enumeration = "EditSemantics", tag = "2")]
    pub semantics: i32,
    #[prost(message, optional, tag = "3")]
    pub reference: ::core::option::Option<AddressReference>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressReferenceEditResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, optional, tag = "2")]
    pub reference: ::core::option::Option<AddressReference>,
}
/// Per-chain metadata document, one record per chain per scope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChainMetadataRecord {
    #[prost(uint64, tag = "1")]
    pub chain_selector: u64,
    /// JSON document.
    #[prost(string, tag = "2")]
    pub metadata: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub row_version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChainMetadataFindRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(uint64, optional, tag = "2")]
    pub chain_selector: ::core::option::Option<u64>,
    #[prost(bool, tag = "3")]
    pub ignore_transaction: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChainMetadataFindResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, repeated, tag = "2")]
    pub records: ::prost::alloc::vec::Vec<ChainMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChainMetadataEditRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(enumeration = "EditSemantics", tag = "2")]
    pub semantics: i32,
    #[prost(message, optional, tag = "3")]
    pub record: ::core::option::Option<ChainMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChainMetadataEditResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, optional, tag = "2")]
    pub record: ::core::option::Option<ChainMetadataRecord>,
}
/// Per-contract metadata document, keyed by (chain_selector, address).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataRecord {
    #[prost(uint64, tag = "1")]
    pub chain_selector: u64,
    #[prost(string, tag = "2")]
    pub address: ::prost::alloc::string::String,
    /// JSON document.
    #[prost(string, tag = "3")]
    pub metadata: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub row_version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataKey {
    #[prost(uint64, tag = "1")]
    pub chain_selector: u64,
    #[prost(string, tag = "2")]
    pub address: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataFindRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(message, optional, tag = "2")]
    pub key: ::core::option::Option<ContractMetadataKey>,
    #[prost(bool, tag = "3")]
    pub ignore_transaction: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataFindResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, repeated, tag = "2")]
    pub records: ::prost::alloc::vec::Vec<ContractMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataEditRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(enumeration = "EditSemantics", tag = "2")]
    pub semantics: i32,
    #[prost(message, optional, tag = "3")]
    pub record: ::core::option::Option<ContractMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractMetadataEditResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, optional, tag = "2")]
    pub record: ::core::option::Option<ContractMetadataRecord>,
}
/// Singleton per-scope environment metadata document.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvMetadataRecord {
    /// JSON document.
    #[prost(string, tag = "1")]
    pub metadata: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub row_version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvMetadataFindRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(bool, tag = "2")]
    pub ignore_transaction: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvMetadataFindResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, repeated, tag = "2")]
    pub records: ::prost::alloc::vec::Vec<EnvMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvMetadataEditRequest {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<Scope>,
    #[prost(enumeration = "EditSemantics", tag = "2")]
    pub semantics: i32,
    #[prost(message, optional, tag = "3")]
    pub record: ::core::option::Option<EnvMetadataRecord>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvMetadataEditResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
    #[prost(message, optional, tag = "2")]
    pub record: ::core::option::Option<EnvMetadataRecord>,
}
/// Transaction state is associated with the session stream; there is no
/// transaction token. A second begin on a stream with an open transaction is
/// rejected with FAILED_PRECONDITION. Commit and rollback without an open
/// transaction succeed silently.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct BeginTransactionRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BeginTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CommitTransactionRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RollbackTransactionRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub status: ::core::option::Option<ResponseStatus>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CatalogRequest {
    #[prost(oneof = "catalog_request::Payload", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11")]
    pub payload: ::core::option::Option<catalog_request::Payload>,
}
/// Nested message and enum types in `CatalogRequest`.
pub mod catalog_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        AddressReferenceFind(super::AddressReferenceFindRequest),
        #[prost(message, tag = "2")]
        AddressReferenceEdit(super::AddressReferenceEditRequest),
        #[prost(message, tag = "3")]
        ChainMetadataFind(super::ChainMetadataFindRequest),
        #[prost(message, tag = "4")]
        ChainMetadataEdit(super::ChainMetadataEditRequest),
        #[prost(message, tag = "5")]
        ContractMetadataFind(super::ContractMetadataFindRequest),
        #[prost(message, tag = "6")]
        ContractMetadataEdit(super::ContractMetadataEditRequest),
        #[prost(message, tag = "7")]
        EnvMetadataFind(super::EnvMetadataFindRequest),
        #[prost(message, tag = "8")]
        EnvMetadataEdit(super::EnvMetadataEditRequest),
        #[prost(message, tag = "9")]
        BeginTransaction(super::BeginTransactionRequest),
        #[prost(message, tag = "10")]
        CommitTransaction(super::CommitTransactionRequest),
        #[prost(message, tag = "11")]
        RollbackTransaction(super::RollbackTransactionRequest),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CatalogResponse {
    #[prost(oneof = "catalog_response::Payload", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11")]
    pub payload: ::core::option::Option<catalog_response::Payload>,
}
/// Nested message and enum types in `CatalogResponse`.
pub mod catalog_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        AddressReferenceFind(super::AddressReferenceFindResponse),
        #[prost(message, tag = "2")]
        AddressReferenceEdit(super::AddressReferenceEditResponse),
        #[prost(message, tag = "3")]
        ChainMetadataFind(super::ChainMetadataFindResponse),
        #[prost(message, tag = "4")]
        ChainMetadataEdit(super::ChainMetadataEditResponse),
        #[prost(message, tag = "5")]
        ContractMetadataFind(super::ContractMetadataFindResponse),
        #[prost(message, tag = "6")]
        ContractMetadataEdit(super::ContractMetadataEditResponse),
        #[prost(message, tag = "7")]
        EnvMetadataFind(super::EnvMetadataFindResponse),
        #[prost(message, tag = "8")]
        EnvMetadataEdit(super::EnvMetadataEditResponse),
        #[prost(message, tag = "9")]
        BeginTransaction(super::BeginTransactionResponse),
        #[prost(message, tag = "10")]
        CommitTransaction(super::CommitTransactionResponse),
        #[prost(message, tag = "11")]
        RollbackTransaction(super::RollbackTransactionResponse),
    }
}
/// Write semantics for edit requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EditSemantics {
    Unspecified = 0,
    /// Reject when the natural key already exists.
    Insert = 1,
    /// Insert when absent, overwrite when present.
    Upsert = 2,
    /// Reject when the natural key does not exist.
    Update = 3,
}
impl EditSemantics {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "EDIT_SEMANTICS_UNSPECIFIED",
            Self::Insert => "EDIT_SEMANTICS_INSERT",
            Self::Upsert => "EDIT_SEMANTICS_UPSERT",
            Self::Update => "EDIT_SEMANTICS_UPDATE",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "EDIT_SEMANTICS_UNSPECIFIED" => Some(Self::Unspecified),
            "EDIT_SEMANTICS_INSERT" => Some(Self::Insert),
            "EDIT_SEMANTICS_UPSERT" => Some(Self::Upsert),
            "EDIT_SEMANTICS_UPDATE" => Some(Self::Update),
            _ => None,
        }
    }
}
/// Generated client implementations.
pub mod catalog_service_client {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value,
    )]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    /// CatalogService is the remote, transactional datastore for deployment
    /// records. A client opens one long-lived Session stream and multiplexes all
    /// of its operations over it; transaction state is bound to the stream, so
    /// closing the stream implicitly rolls back any open transaction.
    #[derive(Debug, Clone)]
    pub struct CatalogServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl CatalogServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> CatalogServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> CatalogServiceClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::Body>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::Body>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::Body>,
            >>::Error: Into<StdError> + std::marker::Send + std::marker::Sync,
        {
            CatalogServiceClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        pub async fn session(
            &mut self,
            request: impl tonic::IntoStreamingRequest<
                Message = super::CatalogRequest,
            >,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::CatalogResponse>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/catalog.v1.CatalogService/Session",
            );
            let mut req = request.into_streaming_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("catalog.v1.CatalogService", "Session"));
            self.inner.streaming(req, path, codec).await
        }
    }
}
/// Generated server implementations.
pub mod catalog_service_server {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value,
    )]
    use tonic::codegen::*;
    /// Generated trait containing gRPC methods that should be implemented for use with CatalogServiceServer.
    #[async_trait]
    pub trait CatalogService: std::marker::Send + std::marker::Sync + 'static {
        /// Server streaming response type for the Session method.
        type SessionStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::CatalogResponse, tonic::Status>,
            >
            + std::marker::Send
            + 'static;
        /// CatalogService is the remote, transactional datastore for deployment
        /// records. A client opens one long-lived Session stream and multiplexes all
        /// of its operations over it; transaction state is bound to the stream, so
        /// closing the stream implicitly rolls back any open transaction.
        async fn session(
            &self,
            request: tonic::Request<tonic::Streaming<super::CatalogRequest>>,
        ) -> std::result::Result<tonic::Response<Self::SessionStream>, tonic::Status>;
    }
    /// CatalogService is the remote, transactional datastore for deployment
    /// records. A client opens one long-lived Session stream and multiplexes all
    /// of its operations over it; transaction state is bound to the stream, so
    /// closing the stream implicitly rolls back any open transaction.
    #[derive(Debug)]
    pub struct CatalogServiceServer<T> {
        inner: Arc<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    impl<T> CatalogServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.max_encoding_message_size = Some(limit);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for CatalogServiceServer<T>
    where
        T: CatalogService,
        B: Body + std::marker::Send + 'static,
        B::Error: Into<StdError> + std::marker::Send + 'static,
    {
        type Response = http::Response<tonic::body::Body>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/catalog.v1.CatalogService/Session" => {
                    #[allow(non_camel_case_types)]
                    struct SessionSvc<T: CatalogService>(pub Arc<T>);
                    impl<
                        T: CatalogService,
                    > tonic::server::StreamingService<super::CatalogRequest>
                    for SessionSvc<T> {
                        type Response = super::CatalogResponse;
                        type ResponseStream = T::SessionStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<tonic::Streaming<super::CatalogRequest>>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as CatalogService>::session(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = SessionSvc(inner);
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        let mut response = http::Response::new(
                            tonic::body::Body::default(),
                        );
                        let headers = response.headers_mut();
                        headers
                            .insert(
                                tonic::Status::GRPC_STATUS,
                                (tonic::Code::Unimplemented as i32).into(),
                            );
                        headers
                            .insert(
                                http::header::CONTENT_TYPE,
                                tonic::metadata::GRPC_CONTENT_TYPE,
                            );
                        Ok(response)
                    })
                }
            }
        }
    }
    impl<T> Clone for CatalogServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    /// Generated gRPC service name
    pub const SERVICE_NAME: &str = "catalog.v1.CatalogService";
    impl<T> tonic::server::NamedService for CatalogServiceServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }
}
