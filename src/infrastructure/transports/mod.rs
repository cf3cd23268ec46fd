pub mod socialsync;

use crate::domain::models::AuthClient;
use crate::domain::models::TransportBox;

pub struct TransportManager {}

impl TransportManager {
    pub fn get(auth: Option<AuthClient>) -> TransportBox {
        return Box::new(socialsync::SocialSyncApi::new(auth));
    }
}
