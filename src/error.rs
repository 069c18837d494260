use std::fmt;

/// Error type for every promptlab operation
/// Implements Clone so results can be stored and compared in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Credential missing, or rejected by the provider (401/403)
    Auth(String)
  , /// The request never produced an HTTP response
    /// (DNS, TLS, connection refused, timeout, body read)
    Transport(String)
  , /// Provider signalled throttling (429)
    RateLimited
    {   retry_after_secs: Option<u64>
    }
  , /// Any other non-2xx response
    Provider
    {   status: u16
      , message: String
    }
  , /// 2xx response whose body could not be decoded
    Parse(String)
  , /// 2xx response with an empty `choices` array
    NoChoicesInResponse
  , /// Caller-supplied prompt or options are unusable
    InvalidRequest(String)
  , /// Configuration is incomplete or malformed
    InvalidConfiguration(String)
  , /// Tool invocation failed (e.g. calculator division by zero)
    Tool(String)
}

impl Error
{   /// Whether a caller may reasonably retry the same request.
    ///
    /// Only throttling and transport failures qualify; everything else
    /// will fail the same way on a second attempt.
    pub fn is_retryable(&self) -> bool
    {   matches!(
          self,
          Error::RateLimited { .. } | Error::Transport(_)
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Auth(msg) => {
              write!(f, "Authentication error: {}", msg)
            }
          , Error::Transport(msg) => {
              write!(f, "Transport error: {}", msg)
            }
          , Error::RateLimited { retry_after_secs } => {
              match retry_after_secs
              {   Some(secs) => write!(
                    f,
                    "API rate limit exceeded (retry after {}s)",
                    secs
                  ),
                  None => write!(f, "API rate limit exceeded")
              }
            }
          , Error::Provider { status, message } => {
              write!(f, "Provider error ({}): {}", status, message)
            }
          , Error::Parse(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "Invalid request: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Tool(msg) => {
              write!(f, "Tool error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
