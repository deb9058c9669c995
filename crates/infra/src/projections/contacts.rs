//! Contact-card projection (address, phones, emails, notification routing).
//!
//! One row per user. Phones and emails hard-delete on removal; removing an
//! entry that a notification preference points at also disables that
//! preference - the cross-effect lives here, in the owning handler, so one
//! event's entire blast radius is visible in one place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orgspine_core::{EventId, UserId};
use orgspine_domain::contact::{ContactEvent, ContactRef, PostalAddress};
use orgspine_events::{DispatchError, DomainEvent};

use crate::read_model::ReadModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRow {
    pub phone_id: Uuid,
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRow {
    pub email_id: Uuid,
    pub address: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyPref {
    pub via: ContactRef,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub user_id: UserId,
    pub address: Option<PostalAddress>,
    pub phones: Vec<PhoneRow>,
    pub emails: Vec<EmailRow>,
    pub notify: Option<NotifyPref>,
    pub last_event_id: EventId,
}

impl ContactCard {
    fn empty(user_id: UserId, last_event_id: EventId) -> Self {
        Self {
            user_id,
            address: None,
            phones: Vec::new(),
            emails: Vec::new(),
            notify: None,
            last_event_id,
        }
    }

    fn has_ref(&self, r: ContactRef) -> bool {
        match r {
            ContactRef::Phone(id) => self.phones.iter().any(|p| p.phone_id == id),
            ContactRef::Email(id) => self.emails.iter().any(|e| e.email_id == id),
        }
    }
}

pub struct ContactsProjection<S> {
    store: S,
}

impl<S> ContactsProjection<S>
where
    S: ReadModelStore<UserId, ContactCard>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn apply(&self, event: &DomainEvent, payload: &ContactEvent) -> Result<(), DispatchError> {
        match payload {
            ContactEvent::AddressSet(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                card.address = Some(e.address.clone());
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::AddressCleared(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                card.address = None;
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::PhoneAdded(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                // Insert-if-absent keyed by phone id.
                if !card.phones.iter().any(|p| p.phone_id == e.phone_id) {
                    card.phones.push(PhoneRow {
                        phone_id: e.phone_id,
                        number: e.number.clone(),
                        label: e.label.clone(),
                    });
                }
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::PhoneRemoved(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                card.phones.retain(|p| p.phone_id != e.phone_id);
                // Cross-effect: a preference routed through the removed phone
                // can no longer fire.
                if let Some(pref) = &mut card.notify {
                    if pref.via == ContactRef::Phone(e.phone_id) {
                        pref.enabled = false;
                    }
                }
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::EmailAdded(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                if !card.emails.iter().any(|m| m.email_id == e.email_id) {
                    card.emails.push(EmailRow {
                        email_id: e.email_id,
                        address: e.address.clone(),
                        label: e.label.clone(),
                    });
                }
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::EmailRemoved(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                card.emails.retain(|m| m.email_id != e.email_id);
                if let Some(pref) = &mut card.notify {
                    if pref.via == ContactRef::Email(e.email_id) {
                        pref.enabled = false;
                    }
                }
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
            ContactEvent::NotificationPreferenceSet(e) => {
                let mut card = self.card_or_empty(e.user_id, event.id);
                if !card.has_ref(e.via) {
                    return Err(DispatchError::Precondition(format!(
                        "notification target {:?} not on the contact card",
                        e.via
                    )));
                }
                card.notify = Some(NotifyPref {
                    via: e.via,
                    enabled: e.enabled,
                });
                card.last_event_id = event.id;
                self.store.upsert(e.user_id, card);
            }
        }
        Ok(())
    }

    fn card_or_empty(&self, user_id: UserId, event_id: EventId) -> ContactCard {
        self.store
            .get(&user_id)
            .unwrap_or_else(|| ContactCard::empty(user_id, event_id))
    }

    pub fn get(&self, user_id: UserId) -> Option<ContactCard> {
        self.store.get(&user_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
