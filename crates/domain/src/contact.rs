//! Contact/address/phone/email aggregate family events.
//!
//! All contact data for a user lives on one projection row (a contact card).
//! Removing a phone also disables any notification preference that references
//! it - a cross-effect applied inside the contact handler itself, never as a
//! secondary emission, so the blast radius of one event stays auditable.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use orgspine_core::UserId;

use crate::{DecodeError, TypedEvent};

pub const CONTACT_ADDRESS_SET: &str = "contact.address_set";
pub const CONTACT_ADDRESS_CLEARED: &str = "contact.address_cleared";
pub const CONTACT_PHONE_ADDED: &str = "contact.phone.added";
pub const CONTACT_PHONE_REMOVED: &str = "contact.phone.removed";
pub const CONTACT_EMAIL_ADDED: &str = "contact.email.added";
pub const CONTACT_EMAIL_REMOVED: &str = "contact.email.removed";
pub const CONTACT_NOTIFY_PREF_SET: &str = "contact.notification_preference_set";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// Which contact entry a notification preference points at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContactRef {
    Phone(Uuid),
    Email(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSet {
    pub user_id: UserId,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCleared {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAdded {
    pub user_id: UserId,
    pub phone_id: Uuid,
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRemoved {
    pub user_id: UserId,
    pub phone_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAdded {
    pub user_id: UserId,
    pub email_id: Uuid,
    pub address: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRemoved {
    pub user_id: UserId,
    pub email_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferenceSet {
    pub user_id: UserId,
    pub via: ContactRef,
    pub enabled: bool,
}

/// All contact events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEvent {
    AddressSet(AddressSet),
    AddressCleared(AddressCleared),
    PhoneAdded(PhoneAdded),
    PhoneRemoved(PhoneRemoved),
    EmailAdded(EmailAdded),
    EmailRemoved(EmailRemoved),
    NotificationPreferenceSet(NotificationPreferenceSet),
}

impl TypedEvent for ContactEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ContactEvent::AddressSet(_) => CONTACT_ADDRESS_SET,
            ContactEvent::AddressCleared(_) => CONTACT_ADDRESS_CLEARED,
            ContactEvent::PhoneAdded(_) => CONTACT_PHONE_ADDED,
            ContactEvent::PhoneRemoved(_) => CONTACT_PHONE_REMOVED,
            ContactEvent::EmailAdded(_) => CONTACT_EMAIL_ADDED,
            ContactEvent::EmailRemoved(_) => CONTACT_EMAIL_REMOVED,
            ContactEvent::NotificationPreferenceSet(_) => CONTACT_NOTIFY_PREF_SET,
        }
    }

    fn decode(event_type: &str, data: &JsonValue) -> Result<Self, DecodeError> {
        let payload = |e| DecodeError::payload(event_type, e);
        match event_type {
            CONTACT_ADDRESS_SET => serde_json::from_value(data.clone())
                .map(ContactEvent::AddressSet)
                .map_err(payload),
            CONTACT_ADDRESS_CLEARED => serde_json::from_value(data.clone())
                .map(ContactEvent::AddressCleared)
                .map_err(payload),
            CONTACT_PHONE_ADDED => serde_json::from_value(data.clone())
                .map(ContactEvent::PhoneAdded)
                .map_err(payload),
            CONTACT_PHONE_REMOVED => serde_json::from_value(data.clone())
                .map(ContactEvent::PhoneRemoved)
                .map_err(payload),
            CONTACT_EMAIL_ADDED => serde_json::from_value(data.clone())
                .map(ContactEvent::EmailAdded)
                .map_err(payload),
            CONTACT_EMAIL_REMOVED => serde_json::from_value(data.clone())
                .map(ContactEvent::EmailRemoved)
                .map_err(payload),
            CONTACT_NOTIFY_PREF_SET => serde_json::from_value(data.clone())
                .map(ContactEvent::NotificationPreferenceSet)
                .map_err(payload),
            _ => Err(DecodeError::UnknownType(event_type.to_string())),
        }
    }

    fn to_data(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            ContactEvent::AddressSet(e) => serde_json::to_value(e),
            ContactEvent::AddressCleared(e) => serde_json::to_value(e),
            ContactEvent::PhoneAdded(e) => serde_json::to_value(e),
            ContactEvent::PhoneRemoved(e) => serde_json::to_value(e),
            ContactEvent::EmailAdded(e) => serde_json::to_value(e),
            ContactEvent::EmailRemoved(e) => serde_json::to_value(e),
            ContactEvent::NotificationPreferenceSet(e) => serde_json::to_value(e),
        }
    }
}
