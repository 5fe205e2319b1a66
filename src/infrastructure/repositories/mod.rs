//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits. Each
//! repository handles data access for a specific entity type.

pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod profile_repository;
pub mod relationship_repository;
pub mod session_repository;
pub mod user_repository;
pub mod verification_repository;

pub use comment_repository::PgCommentRepository;
pub use like_repository::PgLikeRepository;
pub use post_repository::PgPostRepository;
pub use profile_repository::PgProfileRepository;
pub use relationship_repository::PgRelationshipRepository;
pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;
pub use verification_repository::PgVerificationTokenRepository;
