//! Transport encryption enforcement.
//!
//! Requests arriving over plain HTTP are redirected to their `https` URL when
//! safe to repeat (`GET`, `HEAD`) and refused otherwise. The scheme comes from
//! Actix connection info, which honours `Forwarded` and `X-Forwarded-Proto`
//! set by a terminating proxy.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, header};
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::Error as DomainError;

/// Middleware requiring `https` for wrapped routes.
///
/// Disabled instances pass every request through, which keeps local
/// development on plain HTTP possible.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use gears_backend::middleware::RequireTls;
///
/// let app = App::new().service(web::scope("/api/v1").wrap(RequireTls::new(true)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RequireTls {
    enabled: bool,
}

impl RequireTls {
    /// Build the middleware; `enabled = false` makes it a no-op.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireTls
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireTlsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTlsMiddleware {
            service: Rc::new(service),
            enabled: self.enabled,
        }))
    }
}

/// Service wrapper produced by [`RequireTls`].
pub struct RequireTlsMiddleware<S> {
    service: Rc<S>,
    enabled: bool,
}

/// Decision for a plain-HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    Redirect(String),
    Forbidden,
}

fn plain_http_rejection(method: &Method, host: &str, path_and_query: &str) -> Rejection {
    if method == Method::GET || method == Method::HEAD {
        Rejection::Redirect(format!("https://{host}{path_and_query}"))
    } else {
        Rejection::Forbidden
    }
}

impl<S, B> Service<ServiceRequest> for RequireTlsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let secure = req.connection_info().scheme() == "https";
        if !self.enabled || secure {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let rejection = {
            let info = req.connection_info();
            let path_and_query = req
                .uri()
                .path_and_query()
                .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
            plain_http_rejection(req.method(), info.host(), &path_and_query)
        };
        debug!(method = %req.method(), path = req.path(), ?rejection, "plain http request rejected");

        let response = match rejection {
            Rejection::Redirect(location) => HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, location))
                .finish(),
            Rejection::Forbidden => {
                DomainError::forbidden("https is required for this endpoint").error_response()
            }
        };
        Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;

    #[rstest]
    #[case(Method::GET, Rejection::Redirect("https://ada.gears.example/api/v1/assets?x=1".to_owned()))]
    #[case(Method::HEAD, Rejection::Redirect("https://ada.gears.example/api/v1/assets?x=1".to_owned()))]
    #[case(Method::POST, Rejection::Forbidden)]
    #[case(Method::DELETE, Rejection::Forbidden)]
    fn rejection_depends_on_method(#[case] method: Method, #[case] expected: Rejection) {
        assert_eq!(
            plain_http_rejection(&method, "ada.gears.example", "/api/v1/assets?x=1"),
            expected
        );
    }

    async fn call(enabled: bool, request: actix_test::TestRequest) -> ServiceResponse {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/secure")
                    .wrap(RequireTls::new(enabled))
                    .route("", web::get().to(|| async { HttpResponse::Ok().body("ok") }))
                    .route("", web::post().to(|| async { HttpResponse::Ok().body("ok") })),
            ),
        )
        .await;
        actix_test::call_service(&app, request.to_request()).await
    }

    #[actix_web::test]
    async fn plain_get_is_redirected_to_https() {
        let res = call(
            true,
            actix_test::TestRequest::get()
                .uri("/secure?page=2")
                .insert_header(("Host", "ada.gears.example")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers().get(header::LOCATION).map(|v| v.to_str().expect("ascii")),
            Some("https://ada.gears.example/secure?page=2")
        );
    }

    #[actix_web::test]
    async fn plain_post_is_forbidden() {
        let res = call(true, actix_test::TestRequest::post().uri("/secure")).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn forwarded_https_passes_through() {
        let res = call(
            true,
            actix_test::TestRequest::get()
                .uri("/secure")
                .insert_header(("X-Forwarded-Proto", "https")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn disabled_enforcement_passes_plain_http() {
        let res = call(false, actix_test::TestRequest::post().uri("/secure")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
