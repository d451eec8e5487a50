//! Share link encoding and load-time URL decoding.
//!
//! A share link is `<origin+path>?sender=<name>&phone=<phone>` with an optional
//! `name=<recipient>`. Values use `application/x-www-form-urlencoded` escaping,
//! so any string (spaces, Unicode, `&`, `=`, `#`, ...) survives the round trip.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{RecipientContext, SenderIdentity};

pub const SENDER_PARAM: &str = "sender";
pub const PHONE_PARAM: &str = "phone";
pub const NAME_PARAM: &str = "name";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareLink(Url);

impl ShareLink {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Build the link a creator hands out. Any query or fragment on `base` is dropped.
pub fn encode(base: &Url, identity: &SenderIdentity) -> ShareLink {
    build(base, identity, None)
}

/// Like [`encode`], but pre-fills the recipient so the link opens straight
/// into the proposal.
pub fn encode_for_recipient(base: &Url, identity: &SenderIdentity, recipient: &str) -> ShareLink {
    build(base, identity, Some(recipient))
}

fn build(base: &Url, identity: &SenderIdentity, recipient: Option<&str>) -> ShareLink {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(SENDER_PARAM, &identity.name);
        pairs.append_pair(PHONE_PARAM, &identity.phone);
        if let Some(name) = recipient {
            pairs.append_pair(NAME_PARAM, name);
        }
    }
    ShareLink(url)
}

/// Query parameters relevant to the flow, as found on a page URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkParams {
    pub sender: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

impl LinkParams {
    /// `None` unless both sender fields are present; a lone `sender` or
    /// `phone` counts as neither.
    pub fn recipient_context(&self) -> Option<RecipientContext> {
        let (Some(sender), Some(phone)) = (&self.sender, &self.phone) else {
            return None;
        };
        Some(RecipientContext {
            sender_name: sender.clone(),
            sender_phone: phone.clone(),
            recipient_name: self.name.clone(),
        })
    }
}

/// Decode a page URL, a bare `?query`, or a bare `query`.
///
/// Total: input that cannot be understood decodes to all-absent.
pub fn decode(input: &str) -> LinkParams {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => decode_query(url.query().unwrap_or("")),
        Err(_) => decode_query(bare_query(input)),
    }
}

/// Decode an already-extracted query string (no leading `?`).
pub fn decode_query(query: &str) -> LinkParams {
    let mut params = LinkParams::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            SENDER_PARAM => &mut params.sender,
            PHONE_PARAM => &mut params.phone,
            NAME_PARAM => &mut params.name,
            _ => continue,
        };
        // First non-blank occurrence wins; blank values count as absent.
        if slot.is_none() && !value.trim().is_empty() {
            *slot = Some(value.into_owned());
        }
    }
    params
}

fn bare_query(input: &str) -> &str {
    let query = match input.split_once('?') {
        Some((_, q)) => q,
        None if input.contains('=') => input,
        None => "",
    };
    query.split('#').next().unwrap_or("")
}

#[cfg(test)]
#[path = "tests/link_tests.rs"]
mod tests;
