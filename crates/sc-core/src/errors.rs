use sc_core_types::RequestId;
use thiserror::Error;

use crate::addr::Addr;
use crate::element_type::ElementType;

/// Result type alias for graph store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by logging, tests and any
/// outer orchestration layer that needs to branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller contract
    InvalidInput,
    /// More command parameters than the registry has ordinal relations
    InvalidParameters,
    InvalidType,
    NotFound,

    // Protocol
    /// An assumed-infallible store mutation failed; the store is corrupt or misconfigured
    FatalInvariant,
    KeynodeMissing,

    // Configuration
    ConfigInvalid,

    // Integration/IO
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidParameters => "ERR_INVALID_PARAMETERS",
            ExErrorKind::InvalidType => "ERR_INVALID_TYPE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::FatalInvariant => "ERR_FATAL_INVARIANT",
            ExErrorKind::KeynodeMissing => "ERR_KEYNODE_MISSING",
            ExErrorKind::ConfigInvalid => "ERR_CONFIG_INVALID",
            ExErrorKind::Io => "ERR_IO",
        }
    }

    /// Fatal kinds mean the store can no longer be trusted by this process
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExErrorKind::FatalInvariant)
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    element: Option<Addr>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            element: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the graph element the failure is about
    pub fn with_element(mut self, element: Addr) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn element(&self) -> Option<Addr> {
        self.element
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(element) = self.element {
            write!(f, " (element: {})", element)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failures reported by a graph store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Handle is invalid or refers to an erased element
    #[error("Element does not exist: {addr}")]
    ElementNotFound { addr: Addr },

    /// Element type cannot be used for the requested operation
    #[error("Type {actual} cannot be used to {operation}")]
    InvalidType {
        operation: &'static str,
        actual: ElementType,
    },

    /// System identifier already names another element
    #[error("System identifier '{idtf}' is already assigned to {owner}")]
    IdtfTaken { idtf: String, owner: Addr },

    /// System identifier is empty or contains whitespace
    #[error("Invalid system identifier: '{idtf}'")]
    InvalidIdtf { idtf: String },
}

impl From<StoreError> for ExError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ElementNotFound { addr } => ExError::new(ExErrorKind::NotFound)
                .with_element(addr)
                .with_message("Element does not exist"),

            StoreError::InvalidType { operation, actual } => {
                ExError::new(ExErrorKind::InvalidType)
                    .with_op(operation)
                    .with_message(format!("Type {} not allowed", actual))
            }

            StoreError::IdtfTaken { idtf, owner } => ExError::new(ExErrorKind::InvalidInput)
                .with_element(owner)
                .with_message(format!("System identifier '{}' already assigned", idtf)),

            StoreError::InvalidIdtf { idtf } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("Invalid system identifier '{}'", idtf)),
        }
    }
}
