//! HTML page handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use super::ServerState;
use crate::content::{post_scaffold, PostMetadata, PLACEHOLDER_TITLE};
use crate::helpers::{full_url_for, new_post_url, post_path};
use crate::templates::{tag_counts, AboutData, PostCard, SeoData, SiteData};

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    refresh: Option<String>,
}

/// Render a template, turning template errors into a 500
fn render(state: &ServerState, template: &str, context: &Context, status: StatusCode) -> Response {
    match state.templates.render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:?}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Context shared by every page
fn base_context(state: &ServerState, seo: SeoData) -> Context {
    let mut context = Context::new();
    context.insert("site", &SiteData::from_config(&state.config));
    context.insert("seo", &seo);
    context
}

fn page_seo(state: &ServerState, title: String, path: &str) -> SeoData {
    SeoData {
        title,
        description: state.config.description.clone(),
        canonical: full_url_for(&state.config, path),
        og_type: "website".to_string(),
        image: None,
        published_time: None,
        tags: Vec::new(),
    }
}

fn has_tag(post: &PostMetadata, tag: &str) -> bool {
    post.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub async fn home(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HomeQuery>,
) -> Response {
    let posts = state.all_posts().await;
    let active_tag = query.tag.filter(|t| !t.trim().is_empty());

    let cards: Vec<PostCard> = posts
        .iter()
        .filter(|p| active_tag.as_deref().map_or(true, |t| has_tag(p, t)))
        .map(|p| PostCard::new(p, &state.config))
        .collect();

    let seo = page_seo(&state, state.config.title.clone(), "/");
    let mut context = base_context(&state, seo);
    context.insert("posts", &cards);
    context.insert("tags", &tag_counts(&posts));
    context.insert("total", &posts.len());
    context.insert("active_tag", &active_tag);

    render(&state, "index.html", &context, StatusCode::OK)
}

pub async fn post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    let Some(post) = state.loader.get_post_by_slug(&slug).await else {
        return not_found_page(&state, &slug);
    };

    let meta = &post.metadata;
    let card = PostCard::new(meta, &state.config);
    let canonical = full_url_for(&state.config, &post_path(&meta.slug));
    let seo = SeoData {
        title: format!(
            "{} | {}",
            meta.seo_title.as_deref().unwrap_or(&card.clean_title),
            state.config.title
        ),
        description: meta
            .seo_description
            .clone()
            .unwrap_or_else(|| meta.excerpt.clone()),
        canonical: canonical.clone(),
        og_type: "article".to_string(),
        image: meta.cover.clone(),
        published_time: Some(
            meta.date_published
                .clone()
                .unwrap_or_else(|| meta.date.clone()),
        ),
        tags: meta.tags.clone(),
    };

    let mut context = base_context(&state, seo);
    context.insert("post", &card);
    context.insert("content", &state.markdown.render(&post.content));
    context.insert("canonical", &canonical);

    render(&state, "post.html", &context, StatusCode::OK)
}

pub async fn about(State(state): State<Arc<ServerState>>) -> Response {
    let seo = page_seo(&state, format!("About | {}", state.config.title), "/about");
    let mut context = base_context(&state, seo);
    context.insert(
        "about",
        &AboutData {
            body: state.markdown.render(&state.config.about),
            social: state.config.social.clone(),
        },
    );

    render(&state, "about.html", &context, StatusCode::OK)
}

pub async fn admin(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<AdminQuery>,
) -> Response {
    if query.refresh.is_some() {
        tracing::info!("Refreshing posts on request");
        state.invalidate();
    }

    let posts = state.all_posts().await;
    let cards: Vec<PostCard> = posts
        .iter()
        .map(|p| PostCard::new(p, &state.config))
        .collect();
    let now = state.clock.now();

    let seo = page_seo(&state, format!("Admin | {}", state.config.title), "/admin");
    let mut context = base_context(&state, seo);
    context.insert("posts", &cards);
    context.insert("new_post_url", &new_post_url(&state.config.github));
    context.insert(
        "template",
        &post_scaffold(
            PLACEHOLDER_TITLE,
            &now.format("%Y-%m-%d").to_string(),
            &state.config.author,
        ),
    );
    context.insert(
        "refreshed_at",
        &now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    render(&state, "admin.html", &context, StatusCode::OK)
}

pub async fn highlight_css(State(state): State<Arc<ServerState>>) -> Response {
    match state.markdown.highlight_css() {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        Err(e) => {
            tracing::error!("Failed to build highlight stylesheet: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn not_found(State(state): State<Arc<ServerState>>) -> Response {
    not_found_page(&state, "")
}

fn not_found_page(state: &ServerState, slug: &str) -> Response {
    let seo = page_seo(state, format!("Not found | {}", state.config.title), "/");
    let mut context = base_context(state, seo);
    context.insert("slug", slug);

    render(state, "not_found.html", &context, StatusCode::NOT_FOUND)
}
