//! Authentication and session management

pub mod clock;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod session;

pub use clock::{Clock, MockClock, SystemClock};
pub use jwt::{Claims, TokenIssuer};
pub use middleware::{bearer_token, extract_claims, require_auth, AuthUser};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User, UserInfo};
pub use password::{PasswordHasher, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use service::AuthService;
pub use session::{
    decode_token, ClientSession, FileTokenStorage, MemoryTokenStorage, RouteDecision,
    SessionClaims, SessionState, TokenStorage,
};
