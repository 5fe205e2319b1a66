//! Application services orchestrating domain operations.

pub mod auth_service;
pub mod comment_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims, RegisterUserDto};
pub use comment_service::{
    CommentDto, CommentError, CommentService, CommentServiceImpl, CreateCommentDto,
};
pub use post_service::{
    CreatePostDto, LikeOutcome, PostError, PostService, PostServiceImpl, UpdatePostDto,
};
pub use user_service::{
    UpdateProfileDto, UpdateUserDto, UserDto, UserError, UserService, UserServiceImpl,
};
