//! Configuration module

mod site;

pub use site::CacheConfig;
pub use site::GitHubConfig;
pub use site::SiteConfig;
pub use site::SocialLink;
