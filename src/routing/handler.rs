//! Handler traits.
//!
//! `Handler<I, O>` is what applications implement (usually as a closure);
//! `RawHandler` is the type-erased form stored in the route table. The
//! adapter between them owns decoding, panic capture and encoding.

use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::{self, BoxFuture, FutureExt};

use crate::codec::{self, Format, Message};
use crate::error::TwirpError;

/// Application logic for one method.
pub trait Handler<I, O>: Send + Sync + 'static {
    fn call(&self, input: I) -> BoxFuture<'static, Result<O, TwirpError>>;
}

impl<F, Fut, I, O> Handler<I, O> for F
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, TwirpError>> + Send + 'static,
{
    fn call(&self, input: I) -> BoxFuture<'static, Result<O, TwirpError>> {
        Box::pin(self(input))
    }
}

/// A handler operating on encoded bodies.
pub trait RawHandler: Send + Sync + 'static {
    fn call(&self, format: Format, body: Bytes) -> BoxFuture<'static, Result<Bytes, TwirpError>>;
}

/// Bridges a typed `Handler` to `RawHandler`.
pub struct TypedHandler<I, O, H> {
    handler: Arc<H>,
    _shape: PhantomData<fn(I) -> O>,
}

impl<I, O, H> TypedHandler<I, O, H>
where
    I: Message,
    O: Message,
    H: Handler<I, O>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            _shape: PhantomData,
        }
    }
}

impl<I, O, H> RawHandler for TypedHandler<I, O, H>
where
    I: Message,
    O: Message,
    H: Handler<I, O>,
{
    fn call(&self, format: Format, body: Bytes) -> BoxFuture<'static, Result<Bytes, TwirpError>> {
        let input = match codec::decode::<I>(&body, format) {
            Ok(input) => input,
            Err(e) => {
                let err = TwirpError::malformed(format!(
                    "the {} request could not be decoded: {}",
                    format, e
                ));
                return future::ready(Err(err)).boxed();
            }
        };

        let handler = Arc::clone(&self.handler);
        async move {
            let invocation = async move { Handler::call(handler.as_ref(), input).await };
            let output = AssertUnwindSafe(invocation)
                .catch_unwind()
                .await
                .map_err(|payload| TwirpError::internal(panic_message(payload.as_ref())))??;

            codec::encode(&output, format).map_err(|e| {
                TwirpError::internal(format!("failed to encode {} response: {}", format, e))
            })
        }
        .boxed()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
