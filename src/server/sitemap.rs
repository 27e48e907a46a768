//! `sitemap.xml` built from the post collection

use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use super::ServerState;
use crate::config::SiteConfig;
use crate::content::PostMetadata;
use crate::helpers::{full_url_for, post_path};

pub async fn sitemap(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let posts = state.all_posts().await;
    let today = state.clock.now().format("%Y-%m-%d").to_string();
    let xml = build_sitemap(&state.config, &posts, &today);
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
}

/// Home and about first, then one entry per post
pub(crate) fn build_sitemap(
    config: &SiteConfig,
    posts: &[PostMetadata],
    today: &str,
) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    push_url(&mut xml, &full_url_for(config, "/"), today, "daily", "1.0");
    push_url(&mut xml, &full_url_for(config, "/about"), today, "monthly", "0.5");
    for post in posts {
        let loc = full_url_for(config, &post_path(&post.slug));
        push_url(&mut xml, &loc, &post.date, "weekly", "0.8");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    xml.push_str(&format!("    <priority>{}</priority>\n", priority));
    xml.push_str("  </url>\n");
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
