//! Domain entities - the core business objects.

mod clock;
mod post;
mod theme;
mod user;
mod validation;

pub use clock::{advance_past, now};
pub use post::Post;
pub use theme::Theme;
pub use user::User;
