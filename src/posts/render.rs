//! Template-and-replace rendering over the static pages in `res/pages`.
//! Post bodies are markdown.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::db::{CommentRow, PostRow};
use crate::include_res;
use crate::pager::Page;

pub(crate) fn markdown(body: &str) -> String {
    let mut out = String::new();
    pulldown_cmark::html::push_html(&mut out, pulldown_cmark::Parser::new(body));
    out
}

pub(crate) fn fmt_created(micros: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(micros as i128 * 1_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_default()
}

pub(crate) fn post_item(post: &PostRow) -> String {
    let group_link = match &post.group_slug {
        Some(slug) => format!("<a class=\"group\" href=\"/group/{slug}\">{slug}</a>"),
        None => String::new(),
    };
    let image_tag = match &post.image {
        Some(url) => format!("<img src=\"{url}\" alt=\"\">"),
        None => String::new(),
    };

    include_res!(str, "/pages/post_item.html")
        .replace("{id}", &post.id.to_string())
        .replace("{author}", &post.author)
        .replace("{created}", &fmt_created(post.created))
        .replace("{group_link}", &group_link)
        .replace("{image_tag}", &image_tag)
        .replace("{body}", &markdown(&post.body))
}

pub(crate) fn comment_item(comment: &CommentRow) -> String {
    include_res!(str, "/pages/comment_item.html")
        .replace("{author}", &comment.author)
        .replace("{created}", &fmt_created(comment.created))
        .replace("{body}", &comment.body)
}

pub(crate) fn feed(page: &Page<PostRow>) -> String {
    page.items.iter().map(post_item).collect()
}

pub(crate) fn pager_nav<T>(base: &str, page: &Page<T>) -> String {
    let mut nav = String::from("<nav class=\"pager\">");
    if page.has_prev() {
        nav += &format!("<a href=\"{base}?page={}\">newer</a> ", page.number - 1);
    }
    nav += &format!("page {} of {}", page.number, page.total_pages.max(1));
    if page.has_next() {
        nav += &format!(" <a href=\"{base}?page={}\">older</a>", page.number + 1);
    }
    nav + "</nav>"
}

pub(crate) fn compose_form(
    action: &str,
    heading: &str,
    body: &str,
    group: &str,
    image: &str,
    error: &str,
) -> String {
    include_res!(str, "/pages/compose.html")
        .replace("{action}", action)
        .replace("{heading}", heading)
        .replace("{body}", body)
        .replace("{group}", group)
        .replace("{image}", image)
        .replace("{error}", error)
}
