//! Public contact and pricing-interest forms. No session is involved.

use tracing::info;

use crate::{
    dao::{
        intake::IntakeRepository,
        models::{ContactMessageEntity, InterestSignupEntity},
    },
    dto::intake::{ContactRequest, InterestRequest},
    error::ServiceError,
    state::SharedState,
};

const TIERS: [&str; 2] = ["plus", "pro"];

fn trimmed(value: Option<String>) -> String {
    value.map(|value| value.trim().to_string()).unwrap_or_default()
}

fn normalized_email(email: Option<String>) -> Result<String, ServiceError> {
    let email = trimmed(email).to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::InvalidInput("Invalid email".into()));
    }
    Ok(email)
}

fn contact_entity(request: ContactRequest) -> Result<ContactMessageEntity, ServiceError> {
    let name = request
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if name.as_ref().is_some_and(|name| name.chars().count() < 2) {
        return Err(ServiceError::InvalidInput("Invalid name".into()));
    }

    let email = normalized_email(request.email)?;
    let message = trimmed(request.message);
    if message.chars().count() < 5 {
        return Err(ServiceError::InvalidInput("Invalid message".into()));
    }

    Ok(ContactMessageEntity {
        name,
        email,
        message,
    })
}

fn interest_entity(request: InterestRequest) -> Result<InterestSignupEntity, ServiceError> {
    let email = normalized_email(request.email)?;
    let Some(tier) = request.tier.filter(|tier| TIERS.contains(&tier.as_str())) else {
        return Err(ServiceError::InvalidInput("Invalid tier".into()));
    };
    Ok(InterestSignupEntity { email, tier })
}

/// Validate and store a contact form message.
pub async fn submit_contact(state: &SharedState, request: ContactRequest) -> Result<(), ServiceError> {
    let entity = contact_entity(request)?;
    let store = state.require_store().await?;
    IntakeRepository::new(store).insert_contact(&entity).await?;
    info!("contact message received");
    Ok(())
}

/// Validate and store a tier interest signup.
pub async fn register_interest(state: &SharedState, request: InterestRequest) -> Result<(), ServiceError> {
    let entity = interest_entity(request)?;
    let store = state.require_store().await?;
    IntakeRepository::new(store).insert_interest(&entity).await?;
    info!(tier = %entity.tier, "tier interest registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: Option<&str>, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.map(str::to_string),
            email: Some(email.into()),
            message: Some(message.into()),
        }
    }

    fn rejection(result: Result<impl std::fmt::Debug, ServiceError>) -> String {
        match result {
            Err(ServiceError::InvalidInput(reason)) => reason,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn contact_fields_are_trimmed_and_normalized() {
        let entity = contact_entity(contact(Some("  Ann "), " Ann@Example.COM ", " Hello there ")).unwrap();
        assert_eq!(entity.name.as_deref(), Some("Ann"));
        assert_eq!(entity.email, "ann@example.com");
        assert_eq!(entity.message, "Hello there");

        let anonymous = contact_entity(contact(Some("   "), "a@b.c", "Hello")).unwrap();
        assert_eq!(anonymous.name, None);
    }

    #[test]
    fn contact_validation_reasons() {
        assert_eq!(rejection(contact_entity(contact(Some("A"), "a@b.c", "Hello"))), "Invalid name");
        assert_eq!(rejection(contact_entity(contact(None, "nobody", "Hello"))), "Invalid email");
        assert_eq!(rejection(contact_entity(contact(None, "a@b.c", " Hi  "))), "Invalid message");
    }

    #[test]
    fn interest_requires_exact_tier() {
        let entity = interest_entity(InterestRequest {
            email: Some("pro@golf.test".into()),
            tier: Some("pro".into()),
        })
        .unwrap();
        assert_eq!(entity.tier, "pro");

        for tier in [Some("gold"), Some(" PRO "), Some("Plus"), None] {
            let reason = rejection(interest_entity(InterestRequest {
                email: Some("pro@golf.test".into()),
                tier: tier.map(str::to_string),
            }));
            assert_eq!(reason, "Invalid tier");
        }
    }
}
