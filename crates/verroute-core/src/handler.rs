//! Async functions as route handlers
//!
//! Any `async fn` whose arguments are extractors can be declared on a route.
//! Declaring it erases its type right away into a [`BoxedHandler`], the form
//! stored in `RouteTables<BoxedHandler>` and called by the dispatcher after
//! the middleware stack.

use crate::extract::FromRequest;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by type-erased handlers and middleware
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A handler as stored in the route tables
pub type BoxedHandler = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>;

/// An async function usable as a route handler
///
/// `T` is the tuple of extractor types; it only exists so that functions of
/// different arities get distinct impls. Extractors run left to right and
/// the first rejection becomes the response.
pub trait Handler<T>: Clone + Send + Sync + Sized + 'static {
    /// Run the extractors, then the function
    fn call(self, req: Request) -> BoxFuture;

    /// Erase the handler's type
    fn into_boxed(self) -> BoxedHandler {
        Arc::new(move |req| self.clone().call(req))
    }
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, Res, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: FnOnce($($arg,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send + 'static,
            Res: IntoResponse,
            $($arg: FromRequest + Send + 'static,)*
        {
            fn call(self, mut req: Request) -> BoxFuture {
                Box::pin(async move {
                    $(
                        let $arg = match $arg::from_request(&mut req).await {
                            Ok(value) => value,
                            Err(rejection) => {
                                tracing::debug!(
                                    extractor = std::any::type_name::<$arg>(),
                                    served_version = %req.served_version(),
                                    "request rejected by extractor"
                                );
                                return rejection.into_response();
                            }
                        };
                    )*
                    self($($arg,)*).await.into_response()
                })
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
