mod jwt;
pub use jwt::{SessionClaims, bearer_token, generate_token, process_token};
mod error;
pub use error::{CryptError, CryptResult};
