pub mod admin;
pub mod events;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(admin::router())
        .merge(events::router())
        .merge(uploads::router())
}
