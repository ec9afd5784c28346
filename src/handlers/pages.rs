use axum::response::Html;

use crate::middleware::CurrentUser;
use crate::views;

pub async fn home(CurrentUser(principal): CurrentUser) -> Html<String> {
    Html(views::home_page(&principal.username))
}

pub async fn about(_user: CurrentUser) -> Html<String> {
    Html(views::about_page())
}

pub async fn gallery(_user: CurrentUser) -> Html<String> {
    Html(views::gallery_page())
}

pub async fn contact(_user: CurrentUser) -> Html<String> {
    Html(views::contact_page())
}
