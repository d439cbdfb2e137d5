pub mod listing;
pub mod post;

pub use listing::ListingType;
pub use post::{PostRecord, RawPost, DELETED_AUTHOR};
