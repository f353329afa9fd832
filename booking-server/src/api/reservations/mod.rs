//! Reservation API

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::patch)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/tables", post(handler::add_table))
        .route("/{id}/tables/{table_id}", delete(handler::remove_table))
}
