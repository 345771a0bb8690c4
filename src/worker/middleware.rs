//! Watchdog middleware
//!
//! Marks every request in the worker's in-flight table so the supervisor
//! can see how long the oldest one has been running. The response itself
//! passes through untouched: the launcher never alters what the
//! application produces.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use super::heartbeat::InFlightTracker;

/// Drop guard that clears the in-flight entry when the handler future is
/// dropped, whether it completed, errored or panicked.
struct InFlightGuard {
    tracker: Arc<InFlightTracker>,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.finish(self.id);
    }
}

/// Watchdog middleware factory
#[derive(Clone)]
pub struct Watchdog {
    tracker: Arc<InFlightTracker>,
}

impl Watchdog {
    pub fn new(tracker: Arc<InFlightTracker>) -> Self {
        Self { tracker }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Watchdog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = WatchdogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WatchdogService {
            service: Rc::new(service),
            tracker: self.tracker.clone(),
        }))
    }
}

pub struct WatchdogService<S> {
    service: Rc<S>,
    tracker: Arc<InFlightTracker>,
}

impl<S, B> Service<ServiceRequest> for WatchdogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let guard = InFlightGuard {
            tracker: self.tracker.clone(),
            id: self.tracker.begin(),
        };

        Box::pin(async move {
            let result = srv.call(req).await;
            drop(guard);
            result
        })
    }
}
