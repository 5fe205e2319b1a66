//! # Domain Entities
//!
//! Core domain entities representing the main business objects.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **User**: User account with authentication data
//! - **Profile**: One-to-one profile extension of a user
//! - **Relationship**: Directed follow edge between users
//! - **Post**: Author-owned post with a visibility level
//! - **Comment**: Depth-limited threaded comment on a post
//!
//! ## Supporting Entities
//!
//! - **Like**: (user, post) join row with a uniqueness constraint
//! - **EmailVerificationToken**: Single-use account activation token
//! - **Session**: Refresh token session
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod comment;
mod like;
mod post;
mod profile;
mod relationship;
mod session;
mod user;
mod verification;

pub use comment::{
    Comment, CommentDetails, CommentRepository, MAX_COMMENT_LENGTH, MAX_THREAD_DEPTH,
};
pub use like::{Like, LikeRepository, LikeToggle};
pub use post::{Post, PostDetails, PostRepository, Visibility, MAX_POST_LENGTH};
pub use profile::{Profile, ProfileRepository, MAX_BIO_LENGTH};
pub use relationship::{Relationship, RelationshipRepository};
pub use session::{Session, SessionRepository};
pub use user::{User, UserRepository, UserRole};
pub use verification::{EmailVerificationToken, VerificationTokenRepository};

#[cfg(test)]
pub use comment::MockCommentRepository;
#[cfg(test)]
pub use like::MockLikeRepository;
#[cfg(test)]
pub use post::MockPostRepository;
#[cfg(test)]
pub use profile::MockProfileRepository;
#[cfg(test)]
pub use relationship::MockRelationshipRepository;
#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use user::MockUserRepository;
#[cfg(test)]
pub use verification::MockVerificationTokenRepository;
