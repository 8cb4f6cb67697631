use std::future::Future;
use std::pin::Pin;

use crate::event::EventEnvelope;
use crate::KernelError;

pub type HandlerResult =
    Pin<Box<dyn Future<Output = error_stack::Result<(), KernelError>> + Send>>;

// Based on https://github.com/tokio-rs/axum/blob/b6b203b3065e4005bda01efac8429176da055ae2/axum/src/handler/mod.rs#L134-139
pub trait EventHandler: 'static + Sync + Send {
    fn call(&self, envelope: EventEnvelope) -> HandlerResult;
}

impl<F, Res> EventHandler for F
where
    F: 'static + Sync + Send + Fn(EventEnvelope) -> Res,
    Res: 'static + Future<Output = error_stack::Result<(), KernelError>> + Send,
{
    fn call(&self, envelope: EventEnvelope) -> HandlerResult {
        Box::pin(self(envelope))
    }
}
