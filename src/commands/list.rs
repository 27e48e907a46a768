//! List posts and tags

use anyhow::Result;

use crate::templates::tag_counts;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = blog.loader()?;

    match content_type {
        "post" | "posts" => {
            let posts = loader.get_all_posts().await;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let posts = loader.get_all_posts().await;
            let tags = tag_counts(&posts);
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        _ => {
            println!("Unknown type: {}. Use: post, tag", content_type);
        }
    }

    Ok(())
}
