//! Collection names used across the repository layer.

pub const GROUPS: &str = "groups";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const VOTES: &str = "votes";
pub const COMMENT_VOTES: &str = "commentVotes";
pub const DISCUSSIONS: &str = "discussions";
pub const CHANNELS: &str = "channels";
pub const MESSAGES: &str = "messages";
pub const CATEGORIES: &str = "categories";
