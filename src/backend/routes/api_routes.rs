/**
 * API Route Table
 *
 * Every endpoint under `/api`. Only registration, login and the WebSocket
 * upgrade are public; the socket authenticates with its `token` query
 * parameter instead of a header.
 *
 * # Routes
 *
 * ## Users (`/api/user`)
 * - `POST /register`, `POST /login` - public
 * - `GET|PUT /profile`, `GET /profile/{id}`, `GET /developers?category=`
 * - `POST /follow/{id}`, `POST /unfollow/{id}`
 *
 * ## Posts (`/api/post`)
 * - `POST /create`, `GET /feed`, `GET /user/{id}`
 * - `POST /like/{id}`, `POST /comment/{id}`, `POST /share/{id}`
 * - `PUT|DELETE /{id}`
 *
 * ## Notifications (`/api/notifications`)
 * - `GET /`, `PATCH /mark-read/{id}`, `PATCH /mark-all-read`
 *
 * ## Chats (`/api/chats`)
 * - `GET /`, `POST /initiate/{target}`
 * - `GET|POST /{id}/messages`, `PATCH /{id}/read`
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::backend::auth::{
    follow_user, get_profile, get_profile_by_id, list_developers, login, register, unfollow_user,
    update_profile,
};
use crate::backend::chat::handlers as chat;
use crate::backend::middleware::auth_middleware;
use crate::backend::notifications::{
    list_notifications, mark_all_notifications_read, mark_notification_read,
};
use crate::backend::posts::{
    comment_post, create_post, delete_post, get_feed, get_user_posts, like_post, share_post,
    update_post,
};
use crate::backend::realtime::socket_handler;
use crate::backend::server::state::AppState;

/// Build the `/api` router
///
/// Protected routes are wrapped in `auth_middleware`, so a missing or
/// invalid bearer token is rejected with 401 before any handler runs.
pub fn configure_api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/socket", get(socket_handler));

    let protected = Router::new()
        .merge(user_routes())
        .merge(post_routes())
        .merge(notification_routes())
        .merge(chat_routes())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    public.merge(protected)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).put(update_profile))
        .route("/user/profile/{id}", get(get_profile_by_id))
        .route("/user/developers", get(list_developers))
        .route("/user/follow/{id}", post(follow_user))
        .route("/user/unfollow/{id}", post(unfollow_user))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post/create", post(create_post))
        .route("/post/feed", get(get_feed))
        .route("/post/user/{id}", get(get_user_posts))
        .route("/post/like/{id}", post(like_post))
        .route("/post/comment/{id}", post(comment_post))
        .route("/post/share/{id}", post(share_post))
        .route("/post/{id}", put(update_post).delete(delete_post))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/mark-read/{id}", patch(mark_notification_read))
        .route("/notifications/mark-all-read", patch(mark_all_notifications_read))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(chat::list_chats))
        .route("/chats/initiate/{target}", post(chat::initiate_chat))
        .route("/chats/{id}/messages", get(chat::get_messages).post(chat::send_message))
        .route("/chats/{id}/read", patch(chat::mark_chat_read))
}
