pub mod firebase;

use std::sync::Arc;

use crate::domain::models::AuthClient;
use crate::domain::models::FirebaseConfig;

pub struct IdentityManager {}

impl IdentityManager {
    pub fn connect(config: &FirebaseConfig) -> AuthClient {
        return Arc::new(firebase::FirebaseAuth::new(config));
    }
}
