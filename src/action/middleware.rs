//! Axum middleware placing the action hooks around the matched handler.
//!
//! Install with `route_layer(from_fn_with_state(auditor, action_audit_middleware))`
//! below a request-id layer.

use axum::{
    body::Body,
    extract::{FromRequestParts, RawPathParams, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::action::arguments::ActionArguments;
use crate::action::context::ExchangeContext;
use crate::action::interceptor::{ActionAuditor, ActionRequest};
use crate::capture::extract::{buffer_body, media_type, response_side};
use crate::observability::metrics;

pub async fn action_audit_middleware(
    State(auditor): State<ActionAuditor>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let context = match ExchangeContext::begin(&parts, auditor.capture()) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, uri = %parts.uri, "Exchange not audited");
            metrics::record_capture_failure("context");
            return next.run(Request::from_parts(parts, body)).await;
        }
    };

    let (body, captured) = buffer_body(&parts.headers, body, auditor.capture().max_body_bytes).await;

    // route_layer runs after routing, so the matched path parameters are there
    let path = RawPathParams::from_request_parts(&mut parts, &()).await.ok();
    let path_params = path.iter().flat_map(|params| params.iter());
    let format = media_type(&parts.headers);
    let arguments = ActionArguments::bind(path_params, &parts.uri, format.as_deref(), captured.bytes());

    let observed = ActionRequest {
        parts: &parts,
        body: &captured,
        arguments: &arguments,
    };
    if let Err(e) = auditor.on_request_enter(&context, &observed) {
        tracing::error!(correlation_id = %context.correlation_id(), error = %e, "Request capture failed");
        metrics::record_capture_failure("request");
    }

    parts.extensions.insert(arguments);
    parts.extensions.insert(context.clone());

    let response = next.run(Request::from_parts(parts, body)).await;

    if let Err(e) = auditor.on_response_exit(&context, Some(response_side(&response))) {
        tracing::error!(correlation_id = %context.correlation_id(), error = %e, "Response capture failed");
        metrics::record_capture_failure("response");
    }

    response
}
