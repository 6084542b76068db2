use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Tasting;

/// The one host predicate every host-only operation goes through.
pub fn is_host(tasting: &Tasting, user_id: Uuid) -> bool {
    tasting.is_host(user_id)
}

pub fn ensure_host(tasting: &Tasting, user_id: Uuid) -> Result<()> {
    if is_host(tasting, user_id) {
        Ok(())
    } else {
        Err(StorageError::Forbidden(
            "only the host of this tasting may do that".to_string(),
        ))
    }
}

/// Salted with the tasting id so equal passwords on two tastings differ.
pub fn hash_tasting_password(tasting_id: Uuid, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tasting_id.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks a join attempt. Tastings without a password admit anyone.
pub fn verify_tasting_password(tasting: &Tasting, password: Option<&str>) -> Result<()> {
    let Some(expected) = tasting.password_hash.as_deref() else {
        return Ok(());
    };

    match password {
        Some(given) if hash_tasting_password(tasting.tasting_id, given) == expected => Ok(()),
        Some(_) => Err(StorageError::Forbidden("wrong tasting password".to_string())),
        None => Err(StorageError::Forbidden(
            "this tasting requires a password".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn tasting(host_id: Uuid, password: Option<&str>) -> Tasting {
        let tasting_id = Uuid::new_v4();
        Tasting {
            tasting_id,
            host_id,
            name: "Friday blind".to_string(),
            status: "active".to_string(),
            visibility: "private".to_string(),
            password_hash: password.map(|p| hash_tasting_password(tasting_id, p)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_host_passes() {
        let host = Uuid::new_v4();
        let t = tasting(host, None);

        assert!(ensure_host(&t, host).is_ok());
        assert!(matches!(
            ensure_host(&t, Uuid::new_v4()),
            Err(StorageError::Forbidden(_))
        ));
    }

    #[test]
    fn test_password_check() {
        let t = tasting(Uuid::new_v4(), Some("merlot"));

        assert!(verify_tasting_password(&t, Some("merlot")).is_ok());
        assert!(verify_tasting_password(&t, Some("malbec")).is_err());
        assert!(verify_tasting_password(&t, None).is_err());
        assert!(verify_tasting_password(&tasting(Uuid::new_v4(), None), None).is_ok());
    }

    #[test]
    fn test_hash_is_salted_per_tasting() {
        assert_ne!(
            hash_tasting_password(Uuid::new_v4(), "same"),
            hash_tasting_password(Uuid::new_v4(), "same")
        );
    }
}
