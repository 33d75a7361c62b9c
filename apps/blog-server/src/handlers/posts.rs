//! Post handlers.
//!
//! Each post route accepts the slug as `?slug=` or as the last path segment.

use actix_web::{HttpResponse, web};

use quill_core::domain::{NewPost, PostPatch};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, SlugQuery, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts - all posts, or one with `?slug=`
pub async fn list_or_get(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
) -> AppResult<HttpResponse> {
    match selected_slug(query.into_inner()) {
        Some(slug) => get_one(&state, &slug).await,
        None => {
            let posts = state.posts.list().await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
        }
    }
}

/// GET /api/posts/{slug}
pub async fn get_by_path(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    get_one(&state, &path.into_inner()).await
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let draft = into_draft(body.into_inner())?;
    let post = state.posts.create(draft).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PUT /api/posts?slug=
pub async fn update(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let slug = require_slug(query.into_inner())?;
    update_one(&state, &slug, body.into_inner()).await
}

/// PUT /api/posts/{slug}
pub async fn update_by_path(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    update_one(&state, &path.into_inner(), body.into_inner()).await
}

/// DELETE /api/posts?slug=
pub async fn delete(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
) -> AppResult<HttpResponse> {
    let slug = require_slug(query.into_inner())?;
    delete_one(&state, &slug).await
}

/// DELETE /api/posts/{slug}
pub async fn delete_by_path(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    delete_one(&state, &path.into_inner()).await
}

async fn get_one(state: &AppState, slug: &str) -> AppResult<HttpResponse> {
    let post = state.posts.get(slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

async fn update_one(
    state: &AppState,
    slug: &str,
    req: UpdatePostRequest,
) -> AppResult<HttpResponse> {
    let patch = PostPatch {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        cover_image: req.cover_image,
        category: req.category,
        tags: req.tags,
        author: req.author,
    };

    let post = state.posts.update(slug, patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

async fn delete_one(state: &AppState, slug: &str) -> AppResult<HttpResponse> {
    state.posts.delete(slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}

/// An empty `?slug=` selects nothing.
fn selected_slug(query: SlugQuery) -> Option<String> {
    query.slug.filter(|s| !s.is_empty())
}

fn require_slug(query: SlugQuery) -> AppResult<String> {
    selected_slug(query).ok_or_else(|| AppError::BadRequest("Missing post slug".to_string()))
}

/// Boundary validation: title and content must be present and non-blank.
/// Blank optional fields are treated as absent so they take their defaults.
fn into_draft(req: CreatePostRequest) -> AppResult<NewPost> {
    let non_blank = |v: &String| !v.trim().is_empty();

    let (Some(title), Some(content)) = (req.title.filter(non_blank), req.content.filter(non_blank))
    else {
        return Err(AppError::BadRequest(
            "title and content are required".to_string(),
        ));
    };

    Ok(NewPost {
        title,
        content,
        slug: req.slug.filter(non_blank),
        date: req.date.filter(non_blank),
        excerpt: req.excerpt.filter(non_blank),
        cover_image: req.cover_image.filter(non_blank),
        category: req.category.filter(non_blank),
        tags: req.tags,
        author: req.author.filter(non_blank),
    })
}
