//! # dialer-api -- HTTP front-end of the dialer backend
//!
//! Receives HTTP requests, binds their parameters onto typed commands
//! (optionally authenticating a signed envelope first), invokes a business
//! function and writes one uniform response envelope.
//!
//! ## API Surface
//!
//! Every route accepts any method. Parameters come from the query string
//! and from form bodies.
//!
//! | Route                          | Dispatcher | Handler                                  |
//! |--------------------------------|------------|------------------------------------------|
//! | `/cdr`                         | API        | [`handlers::cdr::get_cdr`]               |
//! | `/delete-cdr`                  | API        | [`handlers::cdr::delete_cdr`]            |
//! | `/manager-call-after-hours`    | API        | [`handlers::portal`]                     |
//! | `/show-calling-review`         | API        | [`handlers::portal`]                     |
//! | `/show-calling-popup`          | API        | [`handlers::portal`]                     |
//! | `/manager-phone`               | API        | [`handlers::portal`]                     |
//! | `/manager-phone-for-company`   | API        | [`handlers::portal`]                     |
//! | `/queue-add`                   | AMI        | [`handlers::queue::queue_add`]           |
//! | `/queue-remove`                | AMI        | [`handlers::queue::queue_remove`]        |
//! | `/queue-status`                | AMI        | [`handlers::queue::queue_status`]        |
//! | `/place-call`                  | AMI        | [`handlers::call::place_call`]           |
//! | `/place-call-in-queue`         | AMI        | [`handlers::call::place_call_in_queue`]  |
//! | `/place-spy`                   | AMI        | [`handlers::call::place_spy`]            |
//! | `/show-inuse`                  | AMI        | [`handlers::call::show_inuse`]           |
//! | `/ping-gateway`                | AMI        | [`handlers::call::ping_gateway`]         |
//! | `/check-portals`, `/stats`, `/cdr-count`, `/im-up` | - | [`handlers::diagnostics`] |
//!
//! AMI routes that take a command honor the configured [`verifier::BindMode`].
//! API routes always bind plain parameters.

pub mod binder;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod state;
pub mod verifier;

use axum::routing::any;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::dispatch::{ami, api};
use crate::state::AppState;

/// Assemble the router.
pub fn app(state: AppState) -> Router {
    let mode = state.bind_mode();

    Router::new()
        // CDR store
        .route("/cdr", api::handle(handlers::cdr::get_cdr))
        .route("/delete-cdr", api::handle(handlers::cdr::delete_cdr))
        // Partner portals
        .route(
            "/manager-call-after-hours",
            api::handle(handlers::portal::manager_call_after_hours),
        )
        .route(
            "/show-calling-review",
            api::handle(handlers::portal::show_calling_review),
        )
        .route(
            "/show-calling-popup",
            api::handle(handlers::portal::show_calling_popup),
        )
        .route("/manager-phone", api::handle(handlers::portal::manager_phone))
        .route(
            "/manager-phone-for-company",
            api::handle(handlers::portal::manager_phone_for_company),
        )
        // AMI gateway
        .route("/queue-add", ami::bound(mode, handlers::queue::queue_add))
        .route("/queue-remove", ami::bound(mode, handlers::queue::queue_remove))
        .route("/queue-status", ami::bound(mode, handlers::queue::queue_status))
        .route("/place-call", ami::bound(mode, handlers::call::place_call))
        .route(
            "/place-call-in-queue",
            ami::bound(mode, handlers::call::place_call_in_queue),
        )
        .route("/place-spy", ami::bound(mode, handlers::call::place_spy))
        .route("/show-inuse", ami::unbound(handlers::call::show_inuse))
        .route("/ping-gateway", ami::unbound(handlers::call::ping_gateway))
        // Diagnostics
        .route("/check-portals", any(handlers::diagnostics::check_portals))
        .route("/stats", any(handlers::diagnostics::stats))
        .route("/cdr-count", any(handlers::diagnostics::cdr_count))
        .route("/im-up", any(handlers::diagnostics::im_up))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
