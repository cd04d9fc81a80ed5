use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Result;
use crate::error::ZbxError;

/// Executes one JSON-RPC call and decodes its `result` member.
///
/// Implementations own envelope construction, authentication, network I/O
/// and retry policy. Errors must be reported as-is: callers rely on
/// [`crate::error::ErrorKind`] to tell transport, API and decode failures
/// apart. A `Session` is safe to share between tasks exactly when its
/// transport is.
pub trait Transport {
    fn get<P, R>(&self, method: &'static str, params: &P) -> impl Future<Output = Result<R>> + Send
    where
        P: Serialize + Sync,
        R: DeserializeOwned + Send;
}

/// A record type returned by a `<object>.get` method.
pub trait ApiObject: DeserializeOwned + Send {
    /// JSON-RPC method name, e.g. `problem.get`.
    const GET_METHOD: &'static str;

    type Params: Serialize + Sync;
}

/// Typed query surface over a [`Transport`].
#[derive(Clone, Debug)]
pub struct Session<T> {
    transport: T,
}

impl<T: Transport> Session<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every `O` matching `params`.
    ///
    /// # Errors
    ///
    /// Transport, API and decode errors are returned unchanged.
    /// [`ZbxError::NotFound`] is returned when the call succeeded but the
    /// result set is empty.
    pub async fn get_objects<O: ApiObject>(&self, params: &O::Params) -> Result<Vec<O>> {
        let objects: Vec<O> = self.transport.get(O::GET_METHOD, params).await?;
        if objects.is_empty() {
            debug!(method = O::GET_METHOD, "query matched no records");
            return Err(ZbxError::NotFound {
                method: O::GET_METHOD,
            }
            .into());
        }
        debug!(method = O::GET_METHOD, count = objects.len(), "query returned records");
        Ok(objects)
    }
}
