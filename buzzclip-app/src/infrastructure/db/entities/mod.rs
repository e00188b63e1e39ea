pub mod category;
pub mod notification;
pub mod video;
pub mod video_category;
pub mod vote;
pub mod vote_snapshot;

pub use category::Entity as Category;
pub use notification::Entity as Notification;
pub use video::Entity as Video;
pub use video_category::Entity as VideoCategory;
pub use vote::Entity as Vote;
pub use vote_snapshot::Entity as VoteSnapshot;
