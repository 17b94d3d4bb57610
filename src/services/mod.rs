//! Services is a core layer for the app business logic like
//! payload validation and running storefront calls off the interaction thread.

pub mod comments;
pub mod types;

use std::sync::Arc;

use failure::Error as FailureError;
use futures_cpupool::CpuPool;

use crate::providers::CommentsProvider;

pub use self::comments::*;
pub use self::types::*;

/// Service runs provider calls on the cpu pool
#[derive(Clone)]
pub struct Service {
    pub cpu_pool: CpuPool,
    pub provider: Arc<dyn CommentsProvider + Send + Sync>,
}

impl Service {
    /// Create a new service
    pub fn new(cpu_pool: CpuPool, provider: Arc<dyn CommentsProvider + Send + Sync>) -> Self {
        Self { cpu_pool, provider }
    }

    pub fn spawn_on_pool<T, Func>(&self, f: Func) -> ServiceFuture<T>
    where
        T: Send + 'static,
        Func: FnOnce(&dyn CommentsProvider) -> Result<T, FailureError> + Send + 'static,
    {
        let provider = self.provider.clone();
        Box::new(self.cpu_pool.spawn_fn(move || f(&*provider)))
    }
}
