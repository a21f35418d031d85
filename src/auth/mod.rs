//! Administrator authentication
//!
//! Bearer JWTs signed with the configured secret guard every `/api/admin`
//! route. Passwords are stored as bcrypt hashes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtKeys, TokenBody};
pub use middleware::admin_guard;
pub use password::{hash_password, verify_password};
