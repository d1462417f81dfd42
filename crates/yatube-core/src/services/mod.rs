//! Use cases built on top of the ports.

pub mod accounts;
mod cards;
pub mod form;
pub mod listing;
pub mod pagination;
pub mod posting;

pub use accounts::{AccountService, LoginOutcome, SignupOutcome};
pub use form::{FormErrors, PostInput};
pub use listing::{GroupFeedScope, ListingService};
pub use pagination::{POSTS_PER_PAGE, Page, PageWindow, Paginator, paginate, parse_page_number};
pub use posting::{CreateOutcome, EditOutcome, PostFormContext, PostingService};
