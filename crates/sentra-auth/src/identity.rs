//! Per-provider extraction of the normalized external identity.
//!
//! Each federated provider releases user attributes under its own
//! names; one adapter per provider maps them onto
//! [`ExternalIdentity`]. Dispatch is by the explicit [`Provider`]
//! enum — there is no runtime shape inspection.

use sentra_core::models::{ExternalIdentity, Provider};
use serde_json::Value;

/// Normalize a raw provider attribute map into an [`ExternalIdentity`].
///
/// `Local` never reaches a federated callback; its arm yields an empty
/// identity, which the reconciler rejects as incomplete.
pub fn extract(provider: Provider, attributes: &Value) -> ExternalIdentity {
    match provider {
        Provider::Google => from_google(attributes),
        Provider::Facebook => from_facebook(attributes),
        Provider::Local => ExternalIdentity::default(),
    }
}

/// Google OIDC userinfo: `sub`, `name`, `email`, `picture`.
fn from_google(attributes: &Value) -> ExternalIdentity {
    ExternalIdentity {
        provider_user_id: string_at(attributes, &["sub"]),
        name: string_at(attributes, &["name"]),
        email: string_at(attributes, &["email"]),
        picture: string_at(attributes, &["picture"]),
    }
}

/// Facebook Graph API: `id`, `name`, `email`, nested
/// `picture.data.url`.
fn from_facebook(attributes: &Value) -> ExternalIdentity {
    ExternalIdentity {
        provider_user_id: string_at(attributes, &["id"]),
        name: string_at(attributes, &["name"]),
        email: string_at(attributes, &["email"]),
        picture: string_at(attributes, &["picture", "data", "url"]),
    }
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn google_attributes_normalize() {
        let attrs = json!({
            "sub": "108234",
            "name": "Jane Doe",
            "email": "jane@x.com",
            "picture": "https://lh3.example.com/photo.jpg",
        });

        let identity = extract(Provider::Google, &attrs);
        assert_eq!(identity.provider_user_id.as_deref(), Some("108234"));
        assert_eq!(identity.name.as_deref(), Some("Jane Doe"));
        assert_eq!(identity.email.as_deref(), Some("jane@x.com"));
        assert_eq!(
            identity.picture.as_deref(),
            Some("https://lh3.example.com/photo.jpg")
        );
    }

    #[test]
    fn facebook_picture_is_nested() {
        let attrs = json!({
            "id": "7781",
            "name": "Jane Doe",
            "email": "jane@x.com",
            "picture": { "data": { "url": "https://graph.example.com/7781/picture" } },
        });

        let identity = extract(Provider::Facebook, &attrs);
        assert_eq!(identity.provider_user_id.as_deref(), Some("7781"));
        assert_eq!(
            identity.picture.as_deref(),
            Some("https://graph.example.com/7781/picture")
        );
    }

    #[test]
    fn missing_attributes_stay_none() {
        let identity = extract(Provider::Google, &json!({ "sub": "1" }));
        assert_eq!(identity.name, None);
        assert_eq!(identity.email, None);
        assert_eq!(identity.picture, None);
    }
}
